//! Ranking response and batch analytics types

use super::gate::{FallbackReport, RejectedName};
use super::ranked::{PositioningSummary, RankedName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Final output of a ranking request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingResponse {
    pub request_id: Uuid,
    pub ranked_names: Vec<RankedName>,
    pub rejected_names: Vec<RejectedName>,
    /// Qualified names dropped only by the `maxResults` cap
    pub capped_names: Vec<String>,
    pub threshold_used: f64,
    pub analytics: Analytics,
}

/// Overall-score distribution across every scored candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDistribution {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
    /// Five equal-width bins over [0, 1]
    pub histogram: [usize; 5],
}

/// Pairwise Pearson correlations between quality dimensions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    /// Row-major; 0.0 where a series is constant
    pub values: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateSummary {
    pub mode: String,
    pub initial_threshold: f64,
    pub threshold_used: f64,
    pub qualified: usize,
    pub rejected: usize,
    pub fallback: FallbackReport,
    pub emergency: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionSummary {
    pub by_category: BTreeMap<String, usize>,
    pub by_severity: BTreeMap<String, usize>,
}

/// Batch-level analytics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub distribution: ScoreDistribution,
    pub correlations: CorrelationMatrix,
    pub positioning: PositioningSummary,
    pub gate: GateSummary,
    pub rejections: RejectionSummary,
    pub mean_confidence: f64,
}
