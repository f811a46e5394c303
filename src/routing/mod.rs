//! Task routing: capability scoring and decision orchestration

mod engine;
mod matcher;

pub use engine::{DecisionReason, RankedAgent, RoutingDecision, RoutingEngine};
pub use matcher::{CapabilityMatcher, ScoredCandidate};
