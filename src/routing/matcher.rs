//! Deterministic capability match scoring
//!
//! The score blends three fixed-weight components, all in [0, 1]:
//!
//! - required-capability coverage (weight 0.6): the fraction of required
//!   tags the agent declares; agents that do not cover every required tag
//!   score 0.0 and are excluded from candidacy entirely
//! - specialization bonus (weight 0.2): granted when the agent's
//!   specialization slug appears among the required tags
//! - performance (weight 0.2): the agent's current rolling success rate
//!
//! The weights are configuration constants so identical inputs always
//! produce identical scores. Ties break by raw overlap count, then success
//! rate, then registration order, then agent id — a total order with a
//! single deterministic winner.

use crate::config::ScoringConfig;
use crate::registry::AgentProfile;
use crate::task::Task;
use std::cmp::Ordering;

/// A candidate agent with its computed score and tie-break keys
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub agent_id: String,
    pub score: f64,
    /// Count of required tags the agent covers
    pub overlap: usize,
    pub success_rate: f64,
    /// Registration order from the registry
    pub seq: u64,
}

impl ScoredCandidate {
    /// Ranking order: best candidate first
    pub fn ranking_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.overlap.cmp(&self.overlap))
            .then_with(|| {
                other
                    .success_rate
                    .partial_cmp(&self.success_rate)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| self.seq.cmp(&other.seq))
            .then_with(|| self.agent_id.cmp(&other.agent_id))
    }
}

/// Computes deterministic match scores for task/agent pairs
#[derive(Debug, Clone, Default)]
pub struct CapabilityMatcher {
    weights: ScoringConfig,
}

impl CapabilityMatcher {
    pub fn new(weights: ScoringConfig) -> Self {
        Self { weights }
    }

    /// Score an agent against a task. Returns 0.0 for agents that do not
    /// cover the full requirement — they are not candidates at all.
    pub fn score(&self, task: &Task, agent: &AgentProfile, success_rate: f64) -> f64 {
        if !agent.covers(&task.required_capabilities) {
            return 0.0;
        }

        let required = task.required_capabilities.len();
        let matched = task
            .required_capabilities
            .iter()
            .filter(|tag| agent.capabilities.contains(*tag))
            .count();
        let coverage = matched as f64 / required as f64;

        let specialization = if task
            .required_capabilities
            .contains(agent.specialization.slug())
        {
            1.0
        } else {
            0.0
        };

        self.weights.capability_weight * coverage
            + self.weights.specialization_bonus * specialization
            + self.weights.performance_weight * success_rate.clamp(0.0, 1.0)
    }

    /// Build a scored candidate carrying the tie-break keys
    pub fn candidate(&self, task: &Task, agent: &AgentProfile, success_rate: f64) -> ScoredCandidate {
        let overlap = task
            .required_capabilities
            .iter()
            .filter(|tag| agent.capabilities.contains(*tag))
            .count();
        ScoredCandidate {
            agent_id: agent.agent_id.clone(),
            score: self.score(task, agent, success_rate),
            overlap,
            success_rate,
            seq: agent.seq,
        }
    }
}
