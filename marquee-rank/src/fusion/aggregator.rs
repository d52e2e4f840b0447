//! Dimension Aggregator
//!
//! Fuses analyzer partials into one fully populated `ScoreBreakdown`, then
//! condenses it into a `QualityVector`.
//!
//! # Fusion rules
//! - A field reported by several analyzers takes their confidence-weighted
//!   average (plain mean when every reporter has zero confidence)
//! - A field nobody reported gets `NEUTRAL_SCORE` and is listed as missing
//! - `confidence = max(0.2, 1 - missing / 11)`
//!
//! # Shape statistics
//! - `balance = 1 - min(1, 4.5 * variance(dimensions))`
//! - `magnitude = |dimensions| / sqrt(5)`
//! - `distinctiveness` is batch-relative: the mean cosine dissimilarity to
//!   every other candidate of the same batch, 0.5 for a batch of one

use crate::math::{cosine_similarity, mean, norm, unit, variance};
use crate::models::candidate::NEUTRAL_SCORE;
use crate::models::{Dimension, NameContext, QualityVector, ScoreBreakdown, ScoreField, ScoredCandidate};
use crate::types::PartialScoreBreakdown;
use tracing::debug;

/// Lowest confidence a candidate can carry
pub const MIN_CONFIDENCE: f64 = 0.2;
/// Distinctiveness of a candidate with no peers
pub const SOLO_DISTINCTIVENESS: f64 = 0.5;
/// Variance multiplier in the balance formula
const BALANCE_SCALE: f64 = 4.5;

/// Analyzer output for one candidate, ready for aggregation
#[derive(Debug, Clone)]
pub struct AnalysisInput {
    pub name: String,
    pub partials: Vec<PartialScoreBreakdown>,
    pub analysis_time_ms: u64,
}

/// Stateless aggregator
#[derive(Debug, Clone, Default)]
pub struct DimensionAggregator;

impl DimensionAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate a single candidate; distinctiveness is the solo value
    pub fn aggregate(
        &self,
        name: &str,
        ctx: &NameContext,
        partials: &[PartialScoreBreakdown],
        analysis_time_ms: u64,
    ) -> ScoredCandidate {
        let (breakdown, missing_fields) = fuse_fields(partials);
        let quality_vector = quality_vector(&breakdown, SOLO_DISTINCTIVENESS);
        let confidence = confidence_for(missing_fields.len());
        let overall_score = breakdown.weighted_overall();

        debug!(
            name = %name,
            context = %ctx.learning_key(),
            overall_score,
            confidence,
            missing = missing_fields.len(),
            "Aggregated candidate"
        );

        ScoredCandidate {
            name: name.to_string(),
            breakdown,
            quality_vector,
            overall_score,
            confidence,
            analysis_time_ms,
            missing_fields,
        }
    }

    /// Aggregate a batch, computing batch-relative distinctiveness
    ///
    /// Output order matches input order.
    pub fn aggregate_batch(&self, ctx: &NameContext, inputs: &[AnalysisInput]) -> Vec<ScoredCandidate> {
        let mut candidates: Vec<ScoredCandidate> = inputs
            .iter()
            .map(|input| self.aggregate(&input.name, ctx, &input.partials, input.analysis_time_ms))
            .collect();

        let vectors: Vec<[f64; 5]> = candidates
            .iter()
            .map(|c| c.quality_vector.dimensions())
            .collect();

        for (i, candidate) in candidates.iter_mut().enumerate() {
            candidate.quality_vector.distinctiveness = distinctiveness(i, &vectors);
        }

        candidates
    }
}

/// Confidence-weighted fusion of every field
fn fuse_fields(partials: &[PartialScoreBreakdown]) -> (ScoreBreakdown, Vec<ScoreField>) {
    let mut breakdown = ScoreBreakdown::default();
    let mut missing = Vec::new();

    for field in ScoreField::ALL {
        let values: Vec<(f64, f64)> = partials
            .iter()
            .filter_map(|p| {
                p.get(field)
                    .filter(|v| v.is_finite())
                    .map(|v| (v, unit(p.confidence, 0.0)))
            })
            .collect();

        if values.is_empty() {
            missing.push(field);
            breakdown.set(field, NEUTRAL_SCORE);
            continue;
        }

        let sum_weights: f64 = values.iter().map(|(_, w)| w).sum();
        let fused = if sum_weights > 0.0 {
            values.iter().map(|(v, w)| v * w).sum::<f64>() / sum_weights
        } else {
            values.iter().map(|(v, _)| v).sum::<f64>() / values.len() as f64
        };
        breakdown.set(field, fused);
    }

    (breakdown, missing)
}

fn confidence_for(missing: usize) -> f64 {
    let fraction = missing as f64 / ScoreField::ALL.len() as f64;
    (1.0 - fraction).max(MIN_CONFIDENCE)
}

/// Build the quality vector for a breakdown
pub fn quality_vector(breakdown: &ScoreBreakdown, distinctiveness: f64) -> QualityVector {
    let dim = |d: Dimension| {
        let values: Vec<f64> = d.fields().iter().map(|f| breakdown.get(*f)).collect();
        mean(&values)
    };
    let dims = [
        dim(Dimension::Sound),
        dim(Dimension::Meaning),
        dim(Dimension::Creativity),
        dim(Dimension::Appeal),
        dim(Dimension::Fit),
    ];

    QualityVector {
        sound: dims[0],
        meaning: dims[1],
        creativity: dims[2],
        appeal: dims[3],
        fit: dims[4],
        balance: 1.0 - (variance(&dims) * BALANCE_SCALE).min(1.0),
        magnitude: unit(norm(&dims) / 5f64.sqrt(), 0.0),
        distinctiveness,
    }
}

/// Mean cosine dissimilarity of `vectors[i]` to all other vectors
fn distinctiveness(i: usize, vectors: &[[f64; 5]]) -> f64 {
    if vectors.len() < 2 {
        return SOLO_DISTINCTIVENESS;
    }
    let dissimilarities: Vec<f64> = vectors
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != i)
        .map(|(_, other)| 1.0 - cosine_similarity(&vectors[i], other))
        .collect();
    unit(mean(&dissimilarities), SOLO_DISTINCTIVENESS)
}
