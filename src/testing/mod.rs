//! Test support: fixture constructors shared by unit and integration tests

mod fixtures;

pub use fixtures::{
    agent_profile, task_with_spec, task_with_tags, tier1_spec, tier2_spec, tier3_spec,
};
