//! Quality gate configuration and outcome types

use super::candidate::{ScoreField, ScoredCandidate};
use super::context::NameContext;
use super::request::ThresholdMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lowest threshold the gate will ever apply
pub const THRESHOLD_MIN: f64 = 0.20;
/// Highest threshold the gate will ever apply
pub const THRESHOLD_MAX: f64 = 0.95;

/// Hard exclusion rules applied on top of the threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusionCriteria {
    /// Maximum tolerated pronunciation difficulty (1 - pronunciation)
    pub max_pronunciation_difficulty: f64,
    pub min_memorability: f64,
    pub min_cultural_appeal: f64,
    /// Inclusive bounds on name length in characters
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for ExclusionCriteria {
    fn default() -> Self {
        Self {
            max_pronunciation_difficulty: 0.70,
            min_memorability: 0.25,
            min_cultural_appeal: 0.25,
            min_length: 2,
            max_length: 40,
        }
    }
}

/// Emergency fallback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackSettings {
    pub enabled: bool,
    pub minimum_results: usize,
    pub step: f64,
    /// Threshold the fallback never goes below
    pub floor: f64,
    pub max_steps: usize,
    /// Candidates admitted if gate computation fails outright
    pub emergency_result_count: usize,
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            minimum_results: 3,
            step: 0.05,
            floor: 0.30,
            max_steps: 12,
            emergency_result_count: 3,
        }
    }
}

/// Fully computed gate configuration for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdConfig {
    pub mode: ThresholdMode,
    pub context: NameContext,
    /// Mode base before contextual offsets (learned blend for adaptive)
    pub base_threshold: f64,
    /// Final threshold after offsets and clamping
    pub threshold: f64,
    pub dimensional_minimums: BTreeMap<ScoreField, f64>,
    pub balance_floor: f64,
    pub exclusion_criteria: ExclusionCriteria,
    pub fallback: FallbackSettings,
}

/// Which kind of check a candidate failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionCategory {
    OverallScore,
    Dimensional,
    Balance,
    Exclusion,
    /// Synthetic reason attached when the gate itself failed
    Fallback,
}

/// How far from acceptable a failing check is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Major,
    Critical,
}

/// One failed gate check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionReason {
    pub category: RejectionCategory,
    pub criterion: String,
    pub actual: f64,
    pub required: f64,
    pub severity: Severity,
}

impl RejectionReason {
    pub fn gap(&self) -> f64 {
        (self.actual - self.required).abs()
    }
}

/// Candidate that failed the gate, with explanations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedName {
    pub name: String,
    pub score: f64,
    pub reasons: Vec<RejectionReason>,
    /// 1.0 for near misses, 0.0 for distant failures
    pub improvement_potential: f64,
    /// Criteria missed by no more than 0.05
    pub near_miss_factors: Vec<String>,
}

/// Ordered escalation steps of the emergency fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "step")]
pub enum FallbackStep {
    LowerThreshold { from: f64, to: f64, qualified: usize },
    RelaxMinimums { factor: f64, qualified: usize },
}

/// What the emergency fallback did
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackReport {
    pub triggered: bool,
    pub steps: Vec<FallbackStep>,
    /// Minimum was still not met after exhausting every step
    pub exhausted: bool,
}

/// Result of running the gate over a batch
#[derive(Debug, Clone, PartialEq)]
pub struct GateOutcome {
    /// Qualified candidates in input order
    pub qualified: Vec<ScoredCandidate>,
    pub rejected: Vec<RejectedName>,
    pub initial_threshold: f64,
    pub threshold_used: f64,
    /// Contextual and preference offsets carried by `initial_threshold`,
    /// net of clamping
    pub threshold_offset: f64,
    pub fallback: FallbackReport,
    /// Gate computation failed; result built from raw scores
    pub emergency: bool,
}
