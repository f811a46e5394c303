//! Capability-based task dispatch
//!
//! A library for routing tasks to the best-suited agent out of a registered
//! pool. Agents declare capability tags and a specialization; tasks declare
//! required capabilities and carry a working spec whose risk tier drives
//! structural validation. Routing is deterministic: identical registry state
//! and task input always select the same agent, and every routing call yields
//! an auditable [`RoutingDecision`] whether or not an agent was available.
//!
//! # Example
//!
//! ```
//! use agent_dispatch::config::DispatchConfig;
//! use agent_dispatch::registry::{AgentProfile, Specialization};
//! use agent_dispatch::spec::{RiskTier, WorkingSpec};
//! use agent_dispatch::task::{Task, TaskPriority};
//! use agent_dispatch::Dispatcher;
//!
//! # fn main() -> Result<(), agent_dispatch::DispatchError> {
//! let dispatcher = Dispatcher::new(DispatchConfig::default())?;
//!
//! let profile = AgentProfile::new(
//!     "builder-1",
//!     ["rust", "backend"],
//!     Specialization::Backend,
//! )?;
//! dispatcher.register_agent(profile)?;
//!
//! let spec = WorkingSpec::new(RiskTier::Tier3, vec!["service responds".to_string()]);
//! let task = Task::new(["rust"], TaskPriority::High, spec)?;
//!
//! let decision = dispatcher.submit_task(&task)?;
//! assert_eq!(decision.agent_id.as_deref(), Some("builder-1"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod observability;
pub mod registry;
pub mod routing;
pub mod spec;
pub mod storage;
pub mod task;
pub mod testing;
pub mod tracker;

pub use config::DispatchConfig;
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, DispatchResult};
pub use registry::{AgentProfile, AgentRegistry, AgentStatus, Specialization};
pub use routing::{DecisionReason, RoutingDecision, RoutingEngine};
pub use spec::{RiskTier, SpecValidation, SpecValidator, WorkingSpec};
pub use task::{Task, TaskOutcome, TaskPriority};
pub use tracker::PerformanceTracker;
