//! Storage seam for decision and profile persistence
//!
//! The core is agnostic to how storage is implemented; it only needs a
//! key-value interface with atomic compare-and-set per key. [`MemoryStore`]
//! is the in-process implementation; a durable backend can be substituted by
//! the host without touching the core.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Store-level failures; surfaced distinctly from dispatch errors because
/// they are the only fatal condition class in the system
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Narrow key-value interface the core requires of its storage collaborator
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    fn put(&self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Atomically replace the value at `key` only if the current value
    /// equals `expected` (`None` meaning the key must be absent). Returns
    /// whether the swap happened.
    fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&Value>,
        value: Value,
    ) -> Result<bool, StorageError>;

    fn remove(&self, key: &str) -> Result<Option<Value>, StorageError>;
}

/// In-memory key-value store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&Value>,
        value: Value,
    ) -> Result<bool, StorageError> {
        let mut entries = self.entries.write();
        let current = entries.get(key);
        if current == expected {
            entries.insert(key.to_string(), value);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn remove(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.entries.write().remove(key))
    }
}
