//! Error types for the dispatch core
//!
//! Models the full taxonomy as structured result variants: validation errors,
//! not-found errors, and conflict errors. Exhaustion ("no agent available")
//! is deliberately absent here — it is a normal routing outcome carried by
//! [`crate::routing::DecisionReason`], never an error.

use crate::config::ConfigError;
use crate::registry::AgentStatus;
use crate::storage::StorageError;
use thiserror::Error;

/// Main error type for dispatch operations
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Agent id '{agent_id}' is already registered")]
    DuplicateIdentity { agent_id: String },

    #[error("Invalid agent profile: {message}")]
    InvalidProfile { message: String },

    #[error("Invalid task: {message}")]
    InvalidTask { message: String },

    #[error("Agent '{agent_id}' not found")]
    NotFound { agent_id: String },

    #[error("Outcome reported for unknown agent '{agent_id}'")]
    UnknownAgent { agent_id: String },

    #[error("Invalid status transition for agent '{agent_id}': {from} -> {to}")]
    InvalidTransition {
        agent_id: String,
        from: AgentStatus,
        to: AgentStatus,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl DispatchError {
    /// Create a validation error for a malformed profile
    pub fn invalid_profile<S: Into<String>>(message: S) -> Self {
        Self::InvalidProfile {
            message: message.into(),
        }
    }

    /// Create a validation error for a malformed task
    pub fn invalid_task<S: Into<String>>(message: S) -> Self {
        Self::InvalidTask {
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found<S: Into<String>>(agent_id: S) -> Self {
        Self::NotFound {
            agent_id: agent_id.into(),
        }
    }

    /// Create an unknown-agent error
    pub fn unknown_agent<S: Into<String>>(agent_id: S) -> Self {
        Self::UnknownAgent {
            agent_id: agent_id.into(),
        }
    }

    /// Create a duplicate-identity conflict error
    pub fn duplicate_identity<S: Into<String>>(agent_id: S) -> Self {
        Self::DuplicateIdentity {
            agent_id: agent_id.into(),
        }
    }

    /// True for errors a caller can recover from by correcting its request
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// Result type for dispatch operations
pub type DispatchResult<T> = Result<T, DispatchError>;
