//! Ranked output types

use super::candidate::ScoreField;
use serde::{Deserialize, Serialize};

/// Size of a gap between a candidate and the peer average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifferentiationStrength {
    Weak,
    Moderate,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Advantage,
    Disadvantage,
}

/// A tracked dimension where the candidate stands apart from its peers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferentiationFactor {
    pub field: ScoreField,
    pub strength: DifferentiationStrength,
    pub direction: Direction,
    /// Candidate value minus peer average
    pub gap: f64,
}

/// Where a candidate sits among the qualified batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitivePosition {
    /// Fraction of peers strictly outscored on overall score
    pub percentile: f64,
    pub outperforms: Vec<String>,
    pub underperforms: Vec<String>,
    pub differentiation_factors: Vec<DifferentiationFactor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarketSegment {
    Breakout,
    AvantGarde,
    Mainstream,
    Emerging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPosition {
    pub segment: MarketSegment,
    pub appeal: f64,
    pub viability: f64,
    pub risk: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementOpportunity {
    pub field: ScoreField,
    pub current: f64,
    pub suggestion: String,
}

/// One entry of the final ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedName {
    pub name: String,
    /// 1-based, dense
    pub rank: usize,
    pub overall_score: f64,
    /// Mode-weighted score the ranking was sorted by
    pub final_score: f64,
    pub competitive_position: CompetitivePosition,
    pub market_position: MarketPosition,
    pub strength_areas: Vec<ScoreField>,
    pub improvement_opportunities: Vec<ImprovementOpportunity>,
    pub confidence_score: f64,
    pub explanation: String,
}

/// Proximity cluster in the creativity x market-appeal plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub id: usize,
    pub centroid: (f64, f64),
    pub members: Vec<String>,
    pub label: String,
}

/// Grid cell of the projection with no candidate in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityGap {
    pub creativity_range: (f64, f64),
    pub market_appeal_range: (f64, f64),
    pub description: String,
}

/// Positioning summary of a ranked batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositioningSummary {
    pub clusters: Vec<ClusterSummary>,
    pub opportunity_gaps: Vec<OpportunityGap>,
}
