//! Routing decision engine
//!
//! Orchestrates spec validation, candidate enumeration, scoring, and winner
//! selection. `route()` always returns a decision value: an invalid spec and
//! an empty candidate pool are expected outcomes reported as decision
//! variants, never errors thrown across the boundary.

use crate::config::DispatchConfig;
use crate::error::DispatchResult;
use crate::observability::metrics::metrics;
use crate::registry::{AgentRegistry, AgentStatus};
use crate::routing::matcher::{CapabilityMatcher, ScoredCandidate};
use crate::spec::{SpecValidation, SpecValidator};
use crate::task::{Task, TaskOutcome};
use crate::tracker::PerformanceTracker;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Why a decision came out the way it did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionReason {
    /// An agent was selected and claimed
    Assigned,
    /// No active agent covers the task's requirements; expected and
    /// recoverable, not an error
    NoAgentAvailable,
    /// The working spec failed validation; routing refused
    SpecInvalid { reasons: Vec<String> },
}

/// A ranked alternative carried on a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAgent {
    pub agent_id: String,
    pub score: f64,
}

/// Immutable audit record of one routing call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub decision_id: Uuid,
    pub task_id: Uuid,
    /// Selected agent; absence means "no agent available", never an error
    pub agent_id: Option<String>,
    /// Match score of the winner; 0.0 when no agent was selected
    pub score: f64,
    /// Remaining candidates in ranking order, capped; never contains the
    /// chosen agent
    pub alternatives: Vec<RankedAgent>,
    pub reason: DecisionReason,
    pub created_at: DateTime<Utc>,
}

impl RoutingDecision {
    fn unrouted(task_id: Uuid, reason: DecisionReason) -> Self {
        Self {
            decision_id: Uuid::new_v4(),
            task_id,
            agent_id: None,
            score: 0.0,
            alternatives: Vec::new(),
            reason,
            created_at: Utc::now(),
        }
    }
}

/// Orchestrates validation, scoring, and agent claiming
#[derive(Debug)]
pub struct RoutingEngine {
    registry: Arc<AgentRegistry>,
    tracker: Arc<PerformanceTracker>,
    matcher: CapabilityMatcher,
    validator: SpecValidator,
    max_alternatives: usize,
}

impl RoutingEngine {
    pub fn new(
        registry: Arc<AgentRegistry>,
        tracker: Arc<PerformanceTracker>,
        config: &DispatchConfig,
    ) -> Self {
        Self {
            registry,
            tracker,
            matcher: CapabilityMatcher::new(config.scoring.clone()),
            validator: SpecValidator::new(),
            max_alternatives: config.routing.max_alternatives,
        }
    }

    /// Rank the currently Active, fully-covering candidates for a task.
    ///
    /// Pure with respect to registry state: ranking an identical snapshot
    /// twice yields an identical ordering.
    pub fn rank(&self, task: &Task) -> Vec<ScoredCandidate> {
        let mut candidates: Vec<ScoredCandidate> = self
            .registry
            .query_by_capability(&task.required_capabilities)
            .into_iter()
            .filter(|agent| agent.status == AgentStatus::Active)
            .map(|agent| {
                let rate = self.tracker.success_rate(&agent.agent_id);
                self.matcher.candidate(task, &agent, rate)
            })
            .collect();
        candidates.sort_by(|a, b| a.ranking_cmp(b));
        candidates
    }

    /// Route a task to the best available agent.
    ///
    /// The winner is claimed with a compare-and-transition Active -> Busy;
    /// when a concurrent route claims a candidate first, selection falls
    /// through to the next in ranking order, so two concurrent calls never
    /// assign the same agent.
    pub fn route(&self, task: &Task) -> RoutingDecision {
        if let SpecValidation::Invalid(reasons) = self.validator.validate(&task.spec) {
            warn!(task_id = %task.task_id, violations = reasons.len(), "Routing refused: spec invalid");
            metrics().record_spec_invalid();
            return RoutingDecision::unrouted(
                task.task_id,
                DecisionReason::SpecInvalid { reasons },
            );
        }

        let ranked = self.rank(task);
        if ranked.is_empty() {
            debug!(task_id = %task.task_id, "No active agent covers the task requirements");
            metrics().record_no_agent();
            return RoutingDecision::unrouted(task.task_id, DecisionReason::NoAgentAvailable);
        }

        for (index, winner) in ranked.iter().enumerate() {
            if !self.registry.try_claim(&winner.agent_id) {
                // Claimed or deregistered by a concurrent caller; next in rank
                debug!(task_id = %task.task_id, agent_id = %winner.agent_id, "Candidate lost to concurrent claim");
                continue;
            }

            let alternatives: Vec<RankedAgent> = ranked
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .take(self.max_alternatives)
                .map(|(_, c)| RankedAgent {
                    agent_id: c.agent_id.clone(),
                    score: c.score,
                })
                .collect();

            info!(
                task_id = %task.task_id,
                agent_id = %winner.agent_id,
                score = winner.score,
                alternatives = alternatives.len(),
                "Routed task"
            );
            metrics().record_assigned();

            return RoutingDecision {
                decision_id: Uuid::new_v4(),
                task_id: task.task_id,
                agent_id: Some(winner.agent_id.clone()),
                score: winner.score,
                alternatives,
                reason: DecisionReason::Assigned,
                created_at: Utc::now(),
            };
        }

        // Every ranked candidate was claimed out from under us
        debug!(task_id = %task.task_id, "All candidates claimed concurrently");
        metrics().record_no_agent();
        RoutingDecision::unrouted(task.task_id, DecisionReason::NoAgentAvailable)
    }

    /// Record a completed assignment's outcome and return the agent to the
    /// Active pool
    pub fn report_outcome(&self, agent_id: &str, outcome: TaskOutcome) -> DispatchResult<()> {
        self.tracker.record_outcome(agent_id, outcome)?;
        metrics().record_outcome();
        if !self.registry.release(agent_id) {
            // Outcome for an agent that was never claimed; history still counts
            debug!(agent_id = %agent_id, "Outcome reported for non-busy agent");
        }
        Ok(())
    }
}
