//! Per-agent outcome history and rolling success rates
//!
//! The tracker owns the authoritative outcome history; the registry only
//! carries the derived [`PerformanceSnapshot`] for scoring. History is
//! bounded to a fixed window of recent outcomes so memory stays constant and
//! the rolling rate responds to new data.

use crate::config::TrackerConfig;
use crate::error::{DispatchError, DispatchResult};
use crate::registry::{AgentRegistry, PerformanceSnapshot};
use crate::task::TaskOutcome;
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome history for one agent
#[derive(Debug, Clone)]
pub struct PerformanceRecord {
    pub agent_id: String,
    /// Recent outcomes, oldest first, bounded by the history window
    pub outcomes: VecDeque<TaskOutcome>,
    /// Lifetime totals (not windowed)
    pub successes: u64,
    pub failures: u64,
    /// Rolling success rate over the window
    pub success_rate: f64,
}

impl PerformanceRecord {
    fn new(agent_id: &str, neutral_rate: f64) -> Self {
        Self {
            agent_id: agent_id.to_string(),
            outcomes: VecDeque::new(),
            successes: 0,
            failures: 0,
            success_rate: neutral_rate,
        }
    }
}

/// Records task outcomes and maintains rolling success metrics
#[derive(Debug)]
pub struct PerformanceTracker {
    registry: Arc<AgentRegistry>,
    records: RwLock<HashMap<String, PerformanceRecord>>,
    window: usize,
    neutral_rate: f64,
}

impl PerformanceTracker {
    pub fn new(registry: Arc<AgentRegistry>, config: &TrackerConfig) -> Self {
        Self {
            registry,
            records: RwLock::new(HashMap::new()),
            window: config.history_window,
            neutral_rate: config.neutral_success_rate,
        }
    }

    /// Record an outcome for a registered agent.
    ///
    /// Unknown agents are rejected with `UnknownAgent` and no state is
    /// touched; the failure is a structured result, never a panic.
    pub fn record_outcome(&self, agent_id: &str, outcome: TaskOutcome) -> DispatchResult<()> {
        if !self.registry.contains(agent_id) {
            warn!(agent_id = %agent_id, "Outcome reported for unknown agent");
            return Err(DispatchError::unknown_agent(agent_id));
        }

        let snapshot = {
            let mut records = self.records.write();
            let record = records
                .entry(agent_id.to_string())
                .or_insert_with(|| PerformanceRecord::new(agent_id, self.neutral_rate));

            if outcome.success {
                record.successes += 1;
            } else {
                record.failures += 1;
            }
            record.outcomes.push_back(outcome.clone());
            while record.outcomes.len() > self.window {
                record.outcomes.pop_front();
            }

            let wins = record.outcomes.iter().filter(|o| o.success).count();
            record.success_rate = wins as f64 / record.outcomes.len() as f64;

            PerformanceSnapshot {
                successes: record.successes,
                failures: record.failures,
                success_rate: record.success_rate,
                last_used: Some(outcome.recorded_at),
            }
        };

        debug!(
            agent_id = %agent_id,
            success = outcome.success,
            latency_ms = outcome.latency_ms,
            success_rate = snapshot.success_rate,
            "Recorded task outcome"
        );

        // The agent may have been deregistered between the membership check
        // and this write-back; the history entry stays, the snapshot is moot.
        if let Err(DispatchError::NotFound { .. }) =
            self.registry.update_performance(agent_id, snapshot)
        {
            warn!(agent_id = %agent_id, "Agent deregistered while recording outcome");
        }
        Ok(())
    }

    /// Current rolling success rate; the neutral default applies to agents
    /// with no recorded history (registered or not — never a NotFound).
    pub fn success_rate(&self, agent_id: &str) -> f64 {
        self.records
            .read()
            .get(agent_id)
            .map(|r| r.success_rate)
            .unwrap_or(self.neutral_rate)
    }

    /// Recorded history for an agent, oldest outcome first
    pub fn history(&self, agent_id: &str) -> Option<Vec<TaskOutcome>> {
        self.records
            .read()
            .get(agent_id)
            .map(|r| r.outcomes.iter().cloned().collect())
    }

    /// Drop an agent's history after deregistration
    pub fn forget(&self, agent_id: &str) {
        self.records.write().remove(agent_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{AgentProfile, Specialization};

    fn setup() -> (Arc<AgentRegistry>, PerformanceTracker) {
        let registry = Arc::new(AgentRegistry::new());
        let profile =
            AgentProfile::new("agent-1", ["rust"], Specialization::Backend).unwrap();
        registry.register(profile).unwrap();
        let tracker = PerformanceTracker::new(registry.clone(), &TrackerConfig::default());
        (registry, tracker)
    }

    #[test]
    fn test_neutral_rate_without_history() {
        let (_registry, tracker) = setup();
        assert_eq!(tracker.success_rate("agent-1"), 0.5);
    }

    #[test]
    fn test_record_updates_rolling_rate() {
        let (_registry, tracker) = setup();
        tracker
            .record_outcome("agent-1", TaskOutcome::success(100))
            .unwrap();
        tracker
            .record_outcome("agent-1", TaskOutcome::success(120))
            .unwrap();
        tracker
            .record_outcome("agent-1", TaskOutcome::failure(500))
            .unwrap();

        let rate = tracker.success_rate("agent-1");
        assert!((rate - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_agent_rejected_without_side_effects() {
        let (_registry, tracker) = setup();
        tracker
            .record_outcome("agent-1", TaskOutcome::success(100))
            .unwrap();

        let result = tracker.record_outcome("ghost", TaskOutcome::success(100));
        assert!(matches!(result, Err(DispatchError::UnknownAgent { .. })));
        // Existing records unchanged
        assert_eq!(tracker.success_rate("agent-1"), 1.0);
        assert!(tracker.history("ghost").is_none());
    }

    #[test]
    fn test_snapshot_written_back_to_registry() {
        let (registry, tracker) = setup();
        tracker
            .record_outcome("agent-1", TaskOutcome::success(80))
            .unwrap();

        let profile = registry.get("agent-1").unwrap();
        assert_eq!(profile.performance.successes, 1);
        assert_eq!(profile.performance.success_rate, 1.0);
        assert!(profile.performance.last_used.is_some());
    }

    #[test]
    fn test_history_window_is_bounded() {
        let registry = Arc::new(AgentRegistry::new());
        registry
            .register(AgentProfile::new("a", ["x"], Specialization::Generalist).unwrap())
            .unwrap();
        let config = TrackerConfig {
            history_window: 3,
            neutral_success_rate: 0.5,
        };
        let tracker = PerformanceTracker::new(registry, &config);

        // Three failures pushed out of the window by three successes
        for _ in 0..3 {
            tracker.record_outcome("a", TaskOutcome::failure(10)).unwrap();
        }
        for _ in 0..3 {
            tracker.record_outcome("a", TaskOutcome::success(10)).unwrap();
        }

        assert_eq!(tracker.history("a").unwrap().len(), 3);
        assert_eq!(tracker.success_rate("a"), 1.0);
    }

    #[test]
    fn test_lifetime_totals_outlive_window() {
        let registry = Arc::new(AgentRegistry::new());
        registry
            .register(AgentProfile::new("a", ["x"], Specialization::Generalist).unwrap())
            .unwrap();
        let config = TrackerConfig {
            history_window: 2,
            neutral_success_rate: 0.5,
        };
        let tracker = PerformanceTracker::new(registry.clone(), &config);

        for _ in 0..5 {
            tracker.record_outcome("a", TaskOutcome::success(10)).unwrap();
        }
        let profile = registry.get("a").unwrap();
        assert_eq!(profile.performance.successes, 5);
    }

    #[test]
    fn test_forget_drops_history() {
        let (_registry, tracker) = setup();
        tracker
            .record_outcome("agent-1", TaskOutcome::failure(10))
            .unwrap();
        tracker.forget("agent-1");
        assert!(tracker.history("agent-1").is_none());
        assert_eq!(tracker.success_rate("agent-1"), 0.5);
    }
}
