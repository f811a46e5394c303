//! Working specifications and their structural validation
//!
//! A [`WorkingSpec`] describes what a task must achieve: ordered acceptance
//! criteria plus, for the higher risk tiers, contract and rollback
//! documentation. [`SpecValidator`] enforces the tier rules and reports every
//! violation at once so callers get a complete picture, never an exception.

use serde::{Deserialize, Serialize};

/// Risk tier classifying the scrutiny a task requires.
///
/// Tier 1 is the highest-risk tier; the tier drives which spec sections are
/// mandatory. Unknown tiers are rejected at deserialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    /// Critical: requires contract and rollback plan
    Tier1,
    /// Standard: requires contract
    Tier2,
    /// Low risk: no additional section requirements
    Tier3,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Tier1 => write!(f, "tier 1"),
            RiskTier::Tier2 => write!(f, "tier 2"),
            RiskTier::Tier3 => write!(f, "tier 3"),
        }
    }
}

/// Structured description of a task's acceptance criteria and risk posture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingSpec {
    /// Human-readable title (audit/logging only, no validation rules)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Detailed description (audit/logging only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Risk tier driving the mandatory sections
    pub risk_tier: RiskTier,
    /// Ordered acceptance criteria; an empty list is always invalid
    pub acceptance_criteria: Vec<String>,
    /// Contract description; mandatory at tiers 1 and 2
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
    /// Rollback plan; mandatory at tier 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollback_plan: Option<String>,
}

impl WorkingSpec {
    /// Create a spec with the given tier and criteria
    pub fn new(risk_tier: RiskTier, acceptance_criteria: Vec<String>) -> Self {
        Self {
            title: None,
            description: None,
            risk_tier,
            acceptance_criteria,
            contract: None,
            rollback_plan: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_contract(mut self, contract: impl Into<String>) -> Self {
        self.contract = Some(contract.into());
        self
    }

    pub fn with_rollback_plan(mut self, plan: impl Into<String>) -> Self {
        self.rollback_plan = Some(plan.into());
        self
    }
}

/// Outcome of spec validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpecValidation {
    Valid,
    /// One human-readable reason per violated rule, in rule order
    Invalid(Vec<String>),
}

impl SpecValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, SpecValidation::Valid)
    }

    /// Violation reasons; empty for a valid spec
    pub fn reasons(&self) -> &[String] {
        match self {
            SpecValidation::Valid => &[],
            SpecValidation::Invalid(reasons) => reasons,
        }
    }
}

/// Structural and risk-tier validator for working specs
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecValidator;

impl SpecValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a spec against all rules, accumulating every violation
    pub fn validate(&self, spec: &WorkingSpec) -> SpecValidation {
        let mut reasons = Vec::new();

        if spec.acceptance_criteria.is_empty() {
            reasons.push("acceptance criteria list is empty".to_string());
        }
        for (index, criterion) in spec.acceptance_criteria.iter().enumerate() {
            if criterion.trim().is_empty() {
                reasons.push(format!("acceptance criterion {} is blank", index + 1));
            }
        }

        match spec.risk_tier {
            RiskTier::Tier1 => {
                if !section_present(&spec.contract) {
                    reasons.push("tier 1 spec is missing a contract section".to_string());
                }
                if !section_present(&spec.rollback_plan) {
                    reasons.push("tier 1 spec is missing a rollback plan".to_string());
                }
            }
            RiskTier::Tier2 => {
                if !section_present(&spec.contract) {
                    reasons.push("tier 2 spec is missing a contract section".to_string());
                }
            }
            RiskTier::Tier3 => {}
        }

        if reasons.is_empty() {
            SpecValidation::Valid
        } else {
            SpecValidation::Invalid(reasons)
        }
    }
}

fn section_present(section: &Option<String>) -> bool {
    section.as_deref().is_some_and(|s| !s.trim().is_empty())
}
