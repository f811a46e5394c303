//! Task submissions and reported outcomes
//!
//! A [`Task`] is immutable once submitted for routing; its constructor
//! rejects malformed input (empty requirement sets, blank tags) so invalid
//! tasks never reach the routing path.

use crate::error::{DispatchError, DispatchResult};
use crate::spec::WorkingSpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

/// A unit of work submitted for routing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: Uuid,
    /// Capability tags an agent must cover to be eligible; never empty
    pub required_capabilities: BTreeSet<String>,
    pub priority: TaskPriority,
    pub spec: WorkingSpec,
}

impl Task {
    /// Create a task, rejecting empty or blank requirement sets
    pub fn new<I, S>(
        required_capabilities: I,
        priority: TaskPriority,
        spec: WorkingSpec,
    ) -> DispatchResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let required: BTreeSet<String> = required_capabilities
            .into_iter()
            .map(|s| s.into().trim().to_string())
            .collect();
        if required.is_empty() {
            return Err(DispatchError::invalid_task(
                "required capability set is empty",
            ));
        }
        if required.iter().any(|tag| tag.is_empty()) {
            return Err(DispatchError::invalid_task(
                "required capability tags must not be blank",
            ));
        }
        Ok(Self {
            task_id: Uuid::new_v4(),
            required_capabilities: required,
            priority,
            spec,
        })
    }
}

/// Reported result of a completed task assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub success: bool,
    pub latency_ms: u64,
    pub recorded_at: DateTime<Utc>,
}

impl TaskOutcome {
    pub fn success(latency_ms: u64) -> Self {
        Self {
            success: true,
            latency_ms,
            recorded_at: Utc::now(),
        }
    }

    pub fn failure(latency_ms: u64) -> Self {
        Self {
            success: false,
            latency_ms,
            recorded_at: Utc::now(),
        }
    }
}
