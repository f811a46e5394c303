//! Dispatch facade
//!
//! [`Dispatcher`] wires the registry, tracker, routing engine, and decision
//! store together behind one handle. Hosts embed this type; the component
//! types stay public for callers that need finer-grained composition.

use crate::config::DispatchConfig;
use crate::error::DispatchResult;
use crate::observability::metrics::metrics;
use crate::registry::{AgentProfile, AgentRegistry};
use crate::routing::{RoutingDecision, RoutingEngine};
use crate::spec::{SpecValidation, SpecValidator, WorkingSpec};
use crate::storage::{KvStore, MemoryStore, StorageError};
use crate::task::{Task, TaskOutcome};
use crate::tracker::PerformanceTracker;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

fn decision_key(decision_id: Uuid) -> String {
    format!("decision/{decision_id}")
}

/// Capability-based task dispatcher
pub struct Dispatcher {
    registry: Arc<AgentRegistry>,
    tracker: Arc<PerformanceTracker>,
    engine: RoutingEngine,
    validator: SpecValidator,
    store: Arc<dyn KvStore>,
}

impl Dispatcher {
    /// Build a dispatcher with an in-memory decision store
    pub fn new(config: DispatchConfig) -> DispatchResult<Self> {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Build a dispatcher persisting decisions to the given store
    pub fn with_store(config: DispatchConfig, store: Arc<dyn KvStore>) -> DispatchResult<Self> {
        config.validate()?;

        let registry = Arc::new(AgentRegistry::new());
        let tracker = Arc::new(PerformanceTracker::new(registry.clone(), &config.tracker));
        let engine = RoutingEngine::new(registry.clone(), tracker.clone(), &config);

        Ok(Self {
            registry,
            tracker,
            engine,
            validator: SpecValidator::new(),
            store,
        })
    }

    /// Build a dispatcher from a TOML configuration file
    pub fn from_config_file(path: &Path) -> DispatchResult<Self> {
        let config = DispatchConfig::load_from_file(path)?;
        info!(path = %path.display(), "Loaded dispatch configuration");
        Self::new(config)
    }

    /// Register an agent profile; the agent is eligible for routing
    /// immediately on success
    pub fn register_agent(&self, profile: AgentProfile) -> DispatchResult<String> {
        let agent_id = self.registry.register(profile)?;
        metrics().agent_registered();
        Ok(agent_id)
    }

    /// Remove an agent and drop its outcome history
    pub fn deregister_agent(&self, agent_id: &str) -> DispatchResult<AgentProfile> {
        let profile = self.registry.deregister(agent_id)?;
        self.tracker.forget(agent_id);
        metrics().agent_deregistered();
        Ok(profile)
    }

    /// Route a task and persist the resulting decision.
    ///
    /// Every call produces a decision; the only error surface here is the
    /// decision store itself.
    pub fn submit_task(&self, task: &Task) -> DispatchResult<RoutingDecision> {
        let decision = self.engine.route(task);
        self.persist_decision(&decision)?;
        Ok(decision)
    }

    /// Record a completed assignment's outcome and return the agent to the
    /// eligible pool
    pub fn report_outcome(&self, agent_id: &str, outcome: TaskOutcome) -> DispatchResult<()> {
        self.engine.report_outcome(agent_id, outcome).map_err(|e| {
            metrics().outcome_rejected();
            e
        })
    }

    /// Validate a working spec without routing anything
    pub fn validate_spec(&self, spec: &WorkingSpec) -> SpecValidation {
        self.validator.validate(spec)
    }

    /// Agents covering the required capability set, best-focused first
    pub fn query_agents_by_capability(&self, required: &BTreeSet<String>) -> Vec<AgentProfile> {
        self.registry.query_by_capability(required)
    }

    pub fn get_agent(&self, agent_id: &str) -> DispatchResult<AgentProfile> {
        self.registry.get(agent_id)
    }

    /// Fetch a previously persisted decision by id
    pub fn get_decision(&self, decision_id: Uuid) -> DispatchResult<Option<RoutingDecision>> {
        match self.store.get(&decision_key(decision_id))? {
            Some(value) => {
                let decision = serde_json::from_value(value).map_err(StorageError::from)?;
                Ok(Some(decision))
            }
            None => Ok(None),
        }
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn tracker(&self) -> &PerformanceTracker {
        &self.tracker
    }

    fn persist_decision(&self, decision: &RoutingDecision) -> DispatchResult<()> {
        let value = serde_json::to_value(decision).map_err(StorageError::from)?;
        self.store.put(&decision_key(decision.decision_id), value)?;
        Ok(())
    }
}
