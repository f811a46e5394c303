//! Ready-made valid fixtures for tests
//!
//! Constructors panic on invalid input; they exist to keep test setup short,
//! not to exercise validation paths.

use crate::registry::{AgentProfile, Specialization};
use crate::spec::{RiskTier, WorkingSpec};
use crate::task::{Task, TaskPriority};

/// A valid agent profile with the given id and capability tags
pub fn agent_profile(id: &str, caps: &[&str], specialization: Specialization) -> AgentProfile {
    match AgentProfile::new(id, caps.iter().copied(), specialization) {
        Ok(profile) => profile,
        Err(e) => panic!("fixture profile invalid: {e}"),
    }
}

/// A minimal valid tier 3 spec
pub fn tier3_spec() -> WorkingSpec {
    WorkingSpec::new(RiskTier::Tier3, vec!["task completes".to_string()])
}

/// A valid tier 2 spec (contract section present)
pub fn tier2_spec() -> WorkingSpec {
    WorkingSpec::new(RiskTier::Tier2, vec!["task completes".to_string()])
        .with_contract("inputs and outputs are typed")
}

/// A valid tier 1 spec (contract and rollback plan present)
pub fn tier1_spec() -> WorkingSpec {
    WorkingSpec::new(RiskTier::Tier1, vec!["task completes".to_string()])
        .with_contract("inputs and outputs are typed")
        .with_rollback_plan("revert the deployment")
}

/// A normal-priority task requiring the given capability tags, carrying a
/// valid tier 3 spec
pub fn task_with_tags(tags: &[&str]) -> Task {
    task_with_spec(tags, tier3_spec())
}

/// A normal-priority task with an explicit spec
pub fn task_with_spec(tags: &[&str], spec: WorkingSpec) -> Task {
    match Task::new(tags.iter().copied(), TaskPriority::Normal, spec) {
        Ok(task) => task,
        Err(e) => panic!("fixture task invalid: {e}"),
    }
}
