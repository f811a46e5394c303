//! Configuration for the dispatch core
//!
//! Scoring weights, alternative caps, and tracker tuning are fixed at
//! construction time so that routing stays deterministic and reproducible.
//! Configuration loads from TOML with serde defaults; `validate()` rejects
//! weight sets that would push scores outside the documented [0, 1] range.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Top-level dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DispatchConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

/// Match score weighting. The three weights must sum to 1.0 so the final
/// score stays in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    /// Weight of required-capability coverage
    #[serde(default = "default_capability_weight")]
    pub capability_weight: f64,
    /// Bonus weight when the agent's specialization matches a required tag
    #[serde(default = "default_specialization_bonus")]
    pub specialization_bonus: f64,
    /// Weight of the agent's rolling success rate
    #[serde(default = "default_performance_weight")]
    pub performance_weight: f64,
}

/// Routing decision shaping
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutingConfig {
    /// Maximum ranked alternatives carried on a decision (default: 5)
    #[serde(default = "default_max_alternatives")]
    pub max_alternatives: usize,
}

/// Performance tracker tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackerConfig {
    /// Number of recent outcomes the rolling success rate is computed over
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Success rate assumed for agents with no recorded history
    #[serde(default = "default_neutral_success_rate")]
    pub neutral_success_rate: f64,
}

fn default_capability_weight() -> f64 {
    0.6
}

fn default_specialization_bonus() -> f64 {
    0.2
}

fn default_performance_weight() -> f64 {
    0.2
}

fn default_max_alternatives() -> usize {
    5
}

fn default_history_window() -> usize {
    50
}

fn default_neutral_success_rate() -> f64 {
    0.5
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            capability_weight: default_capability_weight(),
            specialization_bonus: default_specialization_bonus(),
            performance_weight: default_performance_weight(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_alternatives: default_max_alternatives(),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            neutral_success_rate: default_neutral_success_rate(),
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DispatchConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: DispatchConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            self.scoring.capability_weight,
            self.scoring.specialization_bonus,
            self.scoring.performance_weight,
        ];
        if weights.iter().any(|w| *w < 0.0) {
            return Err(ConfigError::InvalidConfig(
                "scoring weights must be non-negative".to_string(),
            ));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(ConfigError::InvalidConfig(format!(
                "scoring weights must sum to 1.0, got {sum}"
            )));
        }
        if self.tracker.history_window == 0 {
            return Err(ConfigError::InvalidConfig(
                "tracker.history_window must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.tracker.neutral_success_rate) {
            return Err(ConfigError::InvalidConfig(format!(
                "tracker.neutral_success_rate must be within [0, 1], got {}",
                self.tracker.neutral_success_rate
            )));
        }
        Ok(())
    }
}
