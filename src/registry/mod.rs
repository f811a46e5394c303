//! Agent registry
//!
//! Thread-safe registry of agent profiles with a compare-and-transition
//! status machine. Reads proceed concurrently; writes are atomic per agent
//! record, so readers observe either the pre-write or post-write state and
//! never a partial update.

mod profile;

pub use profile::{AgentProfile, AgentStatus, PerformanceSnapshot, Specialization};

use crate::error::{DispatchError, DispatchResult};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

#[derive(Debug, Default)]
struct RegistryInner {
    agents: HashMap<String, AgentProfile>,
    next_seq: u64,
}

/// Thread-safe registry of agent profiles
#[derive(Debug, Default)]
pub struct AgentRegistry {
    inner: RwLock<RegistryInner>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a profile. The agent becomes Active immediately: registration
    /// implies eligibility.
    pub fn register(&self, mut profile: AgentProfile) -> DispatchResult<String> {
        if profile.capabilities.is_empty() {
            return Err(DispatchError::invalid_profile(
                "capability set must not be empty",
            ));
        }

        let mut inner = self.inner.write();
        if inner.agents.contains_key(&profile.agent_id) {
            return Err(DispatchError::duplicate_identity(&profile.agent_id));
        }

        profile.seq = inner.next_seq;
        inner.next_seq += 1;
        profile.status = AgentStatus::Active;
        let agent_id = profile.agent_id.clone();
        inner.agents.insert(agent_id.clone(), profile);

        info!(agent_id = %agent_id, "Registered agent");
        Ok(agent_id)
    }

    /// Look up a profile by id
    pub fn get(&self, agent_id: &str) -> DispatchResult<AgentProfile> {
        self.inner
            .read()
            .agents
            .get(agent_id)
            .cloned()
            .ok_or_else(|| DispatchError::not_found(agent_id))
    }

    pub fn contains(&self, agent_id: &str) -> bool {
        self.inner.read().agents.contains_key(agent_id)
    }

    /// Every agent whose capability set is a superset of `required`,
    /// ordered by descending focus score (share of the agent's capability
    /// set the requirement consumes) then ascending registration order.
    pub fn query_by_capability(&self, required: &BTreeSet<String>) -> Vec<AgentProfile> {
        let inner = self.inner.read();
        let mut matches: Vec<AgentProfile> = inner
            .agents
            .values()
            .filter(|agent| agent.covers(required))
            .cloned()
            .collect();
        drop(inner);

        matches.sort_by(|a, b| {
            focus_score(required, b)
                .partial_cmp(&focus_score(required, a))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.seq.cmp(&b.seq))
        });
        matches
    }

    /// Transition an agent's status, validating against the state machine.
    /// The check and the write happen under one critical section, so a stale
    /// expectation can never overwrite a concurrent transition.
    pub fn set_status(&self, agent_id: &str, next: AgentStatus) -> DispatchResult<AgentStatus> {
        let mut inner = self.inner.write();
        let agent = inner
            .agents
            .get_mut(agent_id)
            .ok_or_else(|| DispatchError::not_found(agent_id))?;

        let current = agent.status;
        if !current.can_transition(next) {
            return Err(DispatchError::InvalidTransition {
                agent_id: agent_id.to_string(),
                from: current,
                to: next,
            });
        }
        agent.status = next;
        debug!(agent_id = %agent_id, from = %current, to = %next, "Agent status transition");
        Ok(next)
    }

    /// Compare-and-transition Active -> Busy. Returns false when the agent is
    /// no longer Active (claimed by a concurrent route or deregistered), so
    /// callers can fall through to their next candidate.
    pub fn try_claim(&self, agent_id: &str) -> bool {
        let mut inner = self.inner.write();
        match inner.agents.get_mut(agent_id) {
            Some(agent) if agent.status == AgentStatus::Active => {
                agent.status = AgentStatus::Busy;
                debug!(agent_id = %agent_id, "Claimed agent for assignment");
                true
            }
            _ => false,
        }
    }

    /// Compare-and-transition Busy -> Active after a completion report.
    /// Returns false when the agent was not Busy.
    pub fn release(&self, agent_id: &str) -> bool {
        let mut inner = self.inner.write();
        match inner.agents.get_mut(agent_id) {
            Some(agent) if agent.status == AgentStatus::Busy => {
                agent.status = AgentStatus::Active;
                debug!(agent_id = %agent_id, "Released agent after completion");
                true
            }
            _ => false,
        }
    }

    /// Remove an agent explicitly; removal is never silent
    pub fn deregister(&self, agent_id: &str) -> DispatchResult<AgentProfile> {
        let mut inner = self.inner.write();
        let profile = inner
            .agents
            .remove(agent_id)
            .ok_or_else(|| DispatchError::not_found(agent_id))?;
        info!(agent_id = %agent_id, "Deregistered agent");
        Ok(profile)
    }

    /// Replace an agent's derived performance snapshot in one atomic write
    pub fn update_performance(
        &self,
        agent_id: &str,
        snapshot: PerformanceSnapshot,
    ) -> DispatchResult<()> {
        let mut inner = self.inner.write();
        let agent = inner
            .agents
            .get_mut(agent_id)
            .ok_or_else(|| DispatchError::not_found(agent_id))?;
        agent.performance = snapshot;
        agent.performance.last_used.get_or_insert_with(Utc::now);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.read().agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().agents.is_empty()
    }

    pub fn agent_ids(&self) -> Vec<String> {
        self.inner.read().agents.keys().cloned().collect()
    }
}

/// Share of the agent's capability set consumed by the requirement.
/// Tighter specialists score higher; the caller has already checked coverage.
fn focus_score(required: &BTreeSet<String>, agent: &AgentProfile) -> f64 {
    required.len() as f64 / agent.capabilities.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, caps: &[&str]) -> AgentProfile {
        AgentProfile::new(id, caps.iter().copied(), Specialization::Generalist).unwrap()
    }

    fn caps(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_register_sets_active_immediately() {
        let registry = AgentRegistry::new();
        registry.register(profile("agent-1", &["rust"])).unwrap();
        let stored = registry.get("agent-1").unwrap();
        assert_eq!(stored.status, AgentStatus::Active);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let registry = AgentRegistry::new();
        registry.register(profile("agent-1", &["rust"])).unwrap();
        let result = registry.register(profile("agent-1", &["python"]));
        assert!(matches!(
            result,
            Err(DispatchError::DuplicateIdentity { .. })
        ));
        // Original profile untouched
        assert!(registry.get("agent-1").unwrap().capabilities.contains("rust"));
    }

    #[test]
    fn test_get_unknown_agent() {
        let registry = AgentRegistry::new();
        assert!(matches!(
            registry.get("missing"),
            Err(DispatchError::NotFound { .. })
        ));
    }

    #[test]
    fn test_query_returns_every_superset_match() {
        let registry = AgentRegistry::new();
        registry.register(profile("ab", &["a", "b"])).unwrap();
        registry.register(profile("b-only", &["b"])).unwrap();
        registry.register(profile("c-only", &["c"])).unwrap();

        // Regression: both agents with capability "b" must come back
        let matches = registry.query_by_capability(&caps(&["b"]));
        assert_eq!(matches.len(), 2);
        // Focused specialist first, broader agent second
        assert_eq!(matches[0].agent_id, "b-only");
        assert_eq!(matches[1].agent_id, "ab");
    }

    #[test]
    fn test_query_ties_break_by_registration_order() {
        let registry = AgentRegistry::new();
        registry.register(profile("second", &["x", "y"])).unwrap();
        registry.register(profile("first", &["x", "z"])).unwrap();

        let matches = registry.query_by_capability(&caps(&["x"]));
        // Equal focus scores: registration order decides
        assert_eq!(matches[0].agent_id, "second");
        assert_eq!(matches[1].agent_id, "first");
    }

    #[test]
    fn test_query_is_idempotent() {
        let registry = AgentRegistry::new();
        registry.register(profile("a", &["x"])).unwrap();
        registry.register(profile("b", &["x"])).unwrap();
        let first = registry.query_by_capability(&caps(&["x"]));
        let second = registry.query_by_capability(&caps(&["x"]));
        assert_eq!(first, second);
    }

    #[test]
    fn test_set_status_validates_transition() {
        let registry = AgentRegistry::new();
        registry.register(profile("a", &["x"])).unwrap();

        assert!(registry.set_status("a", AgentStatus::Busy).is_ok());
        let result = registry.set_status("a", AgentStatus::Busy);
        assert!(matches!(
            result,
            Err(DispatchError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_set_status_unknown_agent() {
        let registry = AgentRegistry::new();
        assert!(matches!(
            registry.set_status("ghost", AgentStatus::Busy),
            Err(DispatchError::NotFound { .. })
        ));
    }

    #[test]
    fn test_claim_and_release_cycle() {
        let registry = AgentRegistry::new();
        registry.register(profile("a", &["x"])).unwrap();

        assert!(registry.try_claim("a"));
        // Second claim must fail: the agent is Busy
        assert!(!registry.try_claim("a"));
        assert!(registry.release("a"));
        assert!(!registry.release("a"));
        assert!(registry.try_claim("a"));
    }

    #[test]
    fn test_inactive_agent_cannot_be_claimed() {
        let registry = AgentRegistry::new();
        registry.register(profile("a", &["x"])).unwrap();
        registry.set_status("a", AgentStatus::Inactive).unwrap();
        assert!(!registry.try_claim("a"));

        registry.set_status("a", AgentStatus::Active).unwrap();
        assert!(registry.try_claim("a"));
    }

    #[test]
    fn test_deregister_removes_profile() {
        let registry = AgentRegistry::new();
        registry.register(profile("a", &["x"])).unwrap();
        registry.deregister("a").unwrap();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.deregister("a"),
            Err(DispatchError::NotFound { .. })
        ));
    }

    #[test]
    fn test_update_performance_snapshot() {
        let registry = AgentRegistry::new();
        registry.register(profile("a", &["x"])).unwrap();
        let snapshot = PerformanceSnapshot {
            successes: 3,
            failures: 1,
            success_rate: 0.75,
            last_used: Some(Utc::now()),
        };
        registry.update_performance("a", snapshot.clone()).unwrap();
        let stored = registry.get("a").unwrap();
        assert_eq!(stored.performance.successes, 3);
        assert_eq!(stored.performance.success_rate, 0.75);
    }

    #[test]
    fn test_registration_order_is_monotonic() {
        let registry = AgentRegistry::new();
        registry.register(profile("a", &["x"])).unwrap();
        registry.register(profile("b", &["x"])).unwrap();
        let a = registry.get("a").unwrap();
        let b = registry.get("b").unwrap();
        assert!(a.seq < b.seq);
    }
}
