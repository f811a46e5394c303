//! Thread-safe metrics collection
//!
//! Atomic counters tracking routing decisions, registry churn, and outcome
//! reporting. Counting is lock-free; snapshots read each counter relaxed, so
//! a snapshot taken during concurrent activity is approximate but never
//! torn per counter.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Global metrics collector instance
pub static METRICS: Lazy<MetricsCollector> = Lazy::new(MetricsCollector::new);

/// Get reference to global metrics collector
pub fn metrics() -> &'static MetricsCollector {
    &METRICS
}

/// Thread-safe metrics collector using atomics
#[derive(Debug, Default)]
pub struct MetricsCollector {
    // Routing decision counters
    decisions_assigned: AtomicU64,
    decisions_no_agent: AtomicU64,
    decisions_spec_invalid: AtomicU64,

    // Registry churn
    agents_registered: AtomicU64,
    agents_deregistered: AtomicU64,

    // Outcome reporting
    outcomes_recorded: AtomicU64,
    outcomes_rejected: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_assigned(&self) {
        self.decisions_assigned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_no_agent(&self) {
        self.decisions_no_agent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_spec_invalid(&self) {
        self.decisions_spec_invalid.fetch_add(1, Ordering::Relaxed);
    }

    pub fn agent_registered(&self) {
        self.agents_registered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn agent_deregistered(&self) {
        self.agents_deregistered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_outcome(&self) {
        self.outcomes_recorded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn outcome_rejected(&self) {
        self.outcomes_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Reset all counters (useful for testing)
    pub fn reset(&self) {
        self.decisions_assigned.store(0, Ordering::Relaxed);
        self.decisions_no_agent.store(0, Ordering::Relaxed);
        self.decisions_spec_invalid.store(0, Ordering::Relaxed);
        self.agents_registered.store(0, Ordering::Relaxed);
        self.agents_deregistered.store(0, Ordering::Relaxed);
        self.outcomes_recorded.store(0, Ordering::Relaxed);
        self.outcomes_rejected.store(0, Ordering::Relaxed);
    }

    /// Get complete metrics snapshot
    pub fn get_metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            decisions: DecisionMetrics {
                assigned: self.decisions_assigned.load(Ordering::Relaxed),
                no_agent_available: self.decisions_no_agent.load(Ordering::Relaxed),
                spec_invalid: self.decisions_spec_invalid.load(Ordering::Relaxed),
            },
            registry: RegistryMetrics {
                registered: self.agents_registered.load(Ordering::Relaxed),
                deregistered: self.agents_deregistered.load(Ordering::Relaxed),
            },
            outcomes: OutcomeMetrics {
                recorded: self.outcomes_recorded.load(Ordering::Relaxed),
                rejected: self.outcomes_rejected.load(Ordering::Relaxed),
            },
            timestamp: current_timestamp(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub decisions: DecisionMetrics,
    pub registry: RegistryMetrics,
    pub outcomes: OutcomeMetrics,
    pub timestamp: u64,
}

#[derive(Debug, Serialize)]
pub struct DecisionMetrics {
    pub assigned: u64,
    pub no_agent_available: u64,
    pub spec_invalid: u64,
}

#[derive(Debug, Serialize)]
pub struct RegistryMetrics {
    pub registered: u64,
    pub deregistered: u64,
}

#[derive(Debug, Serialize)]
pub struct OutcomeMetrics {
    pub recorded: u64,
    pub rejected: u64,
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
