//! Agent profiles, specializations, and the status state machine

use crate::error::{DispatchError, DispatchResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Primary focus of an agent, distinct from its capability tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Specialization {
    Backend,
    Frontend,
    Infra,
    Data,
    Testing,
    Security,
    Generalist,
}

impl Specialization {
    /// Tag form of this specialization, matched against task requirements
    pub fn slug(&self) -> &'static str {
        match self {
            Specialization::Backend => "backend",
            Specialization::Frontend => "frontend",
            Specialization::Infra => "infra",
            Specialization::Data => "data",
            Specialization::Testing => "testing",
            Specialization::Security => "security",
            Specialization::Generalist => "generalist",
        }
    }
}

impl std::fmt::Display for Specialization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Agent lifecycle status.
///
/// Registered -> Active happens automatically on registration; Active and
/// Busy exchange through assignment and completion; Inactive is reachable
/// from either and terminal until explicit reactivation. Registered -> Busy
/// is never allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Registered,
    Active,
    Busy,
    Inactive,
}

impl AgentStatus {
    /// Whether the state machine permits moving from `self` to `next`
    pub fn can_transition(self, next: AgentStatus) -> bool {
        use AgentStatus::*;
        matches!(
            (self, next),
            (Registered, Active)
                | (Active, Busy)
                | (Busy, Active)
                | (Active, Inactive)
                | (Busy, Inactive)
                | (Inactive, Active)
        )
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentStatus::Registered => write!(f, "registered"),
            AgentStatus::Active => write!(f, "active"),
            AgentStatus::Busy => write!(f, "busy"),
            AgentStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// Derived performance snapshot held on the profile for scoring.
///
/// The authoritative outcome history lives in the performance tracker; the
/// registry only carries this snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub successes: u64,
    pub failures: u64,
    /// Rolling success rate over the tracker's bounded window
    pub success_rate: f64,
    pub last_used: Option<DateTime<Utc>>,
}

impl Default for PerformanceSnapshot {
    fn default() -> Self {
        Self {
            successes: 0,
            failures: 0,
            success_rate: 0.5,
            last_used: None,
        }
    }
}

/// A registered worker with declared capabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Unique, immutable identifier matching `[a-zA-Z0-9._-]+`
    pub agent_id: String,
    /// Declared capability tags; never empty
    pub capabilities: BTreeSet<String>,
    pub specialization: Specialization,
    pub status: AgentStatus,
    pub performance: PerformanceSnapshot,
    pub registered_at: DateTime<Utc>,
    /// Registration order assigned by the registry, used for tie-breaks
    #[serde(default)]
    pub seq: u64,
}

impl AgentProfile {
    /// Create a profile, rejecting malformed ids and empty capability sets
    pub fn new<I, S>(
        agent_id: impl Into<String>,
        capabilities: I,
        specialization: Specialization,
    ) -> DispatchResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let agent_id = agent_id.into();
        validate_agent_id(&agent_id)?;

        let capabilities: BTreeSet<String> = capabilities
            .into_iter()
            .map(|s| s.into().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if capabilities.is_empty() {
            return Err(DispatchError::invalid_profile(
                "capability set must not be empty",
            ));
        }

        Ok(Self {
            agent_id,
            capabilities,
            specialization,
            status: AgentStatus::Registered,
            performance: PerformanceSnapshot::default(),
            registered_at: Utc::now(),
            seq: 0,
        })
    }

    /// Whether this agent's capability set covers every required tag
    pub fn covers(&self, required: &BTreeSet<String>) -> bool {
        required.is_subset(&self.capabilities)
    }
}

/// Validate agent id format: non-empty, `[a-zA-Z0-9._-]+`
fn validate_agent_id(agent_id: &str) -> DispatchResult<()> {
    let valid_chars = agent_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');

    if agent_id.is_empty() || !valid_chars {
        return Err(DispatchError::invalid_profile(format!(
            "agent id '{agent_id}' must match pattern [a-zA-Z0-9._-]+"
        )));
    }

    Ok(())
}
