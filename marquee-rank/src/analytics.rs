//! Batch analytics
//!
//! Descriptive statistics over every scored candidate of a request, plus the
//! gate and positioning summaries. Analytics never fail a request: any
//! problem yields `Analytics::default()` and a warning.

use crate::error::SummaryError;
use crate::math::{mean, pearson, quantile_sorted, std_dev};
use crate::models::response::{CorrelationMatrix, GateSummary, RejectionSummary, ScoreDistribution};
use crate::models::{Analytics, Dimension, GateOutcome, PositioningSummary, RejectedName, ScoredCandidate, ThresholdMode};
use std::collections::BTreeMap;
use tracing::warn;

const HISTOGRAM_BINS: usize = 5;

/// Build analytics, degrading to the default on failure
pub fn build_analytics(
    scored: &[ScoredCandidate],
    gate: &GateOutcome,
    mode: ThresholdMode,
    positioning: PositioningSummary,
) -> Analytics {
    match try_build_analytics(scored, gate, mode, positioning) {
        Ok(analytics) => analytics,
        Err(e) => {
            warn!(error = %e, "Analytics failed; returning empty analytics");
            Analytics::default()
        }
    }
}

pub fn try_build_analytics(
    scored: &[ScoredCandidate],
    gate: &GateOutcome,
    mode: ThresholdMode,
    positioning: PositioningSummary,
) -> Result<Analytics, SummaryError> {
    let confidences: Vec<f64> = scored.iter().map(|c| c.confidence).collect();
    Ok(Analytics {
        distribution: distribution(scored)?,
        correlations: correlations(scored),
        positioning,
        gate: gate_summary(gate, mode),
        rejections: rejection_summary(&gate.rejected),
        mean_confidence: mean(&confidences),
    })
}

pub fn distribution(scored: &[ScoredCandidate]) -> Result<ScoreDistribution, SummaryError> {
    let mut scores: Vec<f64> = scored.iter().map(|c| c.overall_score).collect();
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(SummaryError::NonFinite("overall scores"));
    }
    if scores.is_empty() {
        return Ok(ScoreDistribution::default());
    }
    scores.sort_by(f64::total_cmp);

    let mut histogram = [0usize; HISTOGRAM_BINS];
    for s in &scores {
        let bin = ((s * HISTOGRAM_BINS as f64).floor() as usize).min(HISTOGRAM_BINS - 1);
        histogram[bin] += 1;
    }

    Ok(ScoreDistribution {
        count: scores.len(),
        mean: mean(&scores),
        median: quantile_sorted(&scores, 0.5),
        std_dev: std_dev(&scores),
        min: scores[0],
        max: scores[scores.len() - 1],
        q1: quantile_sorted(&scores, 0.25),
        q3: quantile_sorted(&scores, 0.75),
        histogram,
    })
}

/// Pearson matrix over the five dimensions and the overall score
pub fn correlations(scored: &[ScoredCandidate]) -> CorrelationMatrix {
    let mut labels: Vec<String> = Dimension::ALL.iter().map(|d| d.as_str().to_string()).collect();
    labels.push("overall".to_string());

    let mut series: Vec<Vec<f64>> = Dimension::ALL
        .iter()
        .map(|&d| scored.iter().map(|c| c.quality_vector.get(d)).collect())
        .collect();
    series.push(scored.iter().map(|c| c.overall_score).collect());

    let values = series
        .iter()
        .map(|a| series.iter().map(|b| pearson(a, b).unwrap_or(0.0)).collect())
        .collect();

    CorrelationMatrix { labels, values }
}

pub fn gate_summary(gate: &GateOutcome, mode: ThresholdMode) -> GateSummary {
    GateSummary {
        mode: mode.as_str().to_string(),
        initial_threshold: gate.initial_threshold,
        threshold_used: gate.threshold_used,
        qualified: gate.qualified.len(),
        rejected: gate.rejected.len(),
        fallback: gate.fallback.clone(),
        emergency: gate.emergency,
    }
}

/// Reason counts by category and severity
pub fn rejection_summary(rejected: &[RejectedName]) -> RejectionSummary {
    let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_severity: BTreeMap<String, usize> = BTreeMap::new();
    for reason in rejected.iter().flat_map(|r| &r.reasons) {
        *by_category.entry(label(&reason.category)).or_default() += 1;
        *by_severity.entry(label(&reason.severity)).or_default() += 1;
    }
    RejectionSummary {
        by_category,
        by_severity,
    }
}

/// Serialized form of a unit enum variant
fn label<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::quality_vector;
    use crate::models::{FallbackReport, RejectionCategory, RejectionReason, ScoreBreakdown, Severity};

    fn scored(value: f64) -> ScoredCandidate {
        let b = ScoreBreakdown::uniform(value);
        ScoredCandidate {
            name: format!("N{}", value),
            quality_vector: quality_vector(&b, 0.5),
            overall_score: b.weighted_overall(),
            breakdown: b,
            confidence: 0.8,
            analysis_time_ms: 0,
            missing_fields: vec![],
        }
    }

    fn outcome() -> GateOutcome {
        GateOutcome {
            qualified: vec![],
            rejected: vec![],
            initial_threshold: 0.65,
            threshold_used: 0.6,
            threshold_offset: 0.0,
            fallback: FallbackReport::default(),
            emergency: false,
        }
    }

    #[test]
    fn test_distribution() {
        let batch: Vec<_> = [0.1, 0.3, 0.5, 0.7, 0.9].iter().map(|&v| scored(v)).collect();
        let d = distribution(&batch).unwrap();
        assert_eq!(d.count, 5);
        assert!((d.mean - 0.5).abs() < 1e-9);
        assert!((d.median - 0.5).abs() < 1e-9);
        assert!((d.q1 - 0.3).abs() < 1e-9);
        assert_eq!(d.histogram, [1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_score_of_one_lands_in_last_bin() {
        let d = distribution(&[scored(1.0)]).unwrap();
        assert_eq!(d.histogram, [0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_degenerate_correlations_are_zero() {
        let batch = vec![scored(0.5), scored(0.5)];
        let m = correlations(&batch);
        assert_eq!(m.labels.len(), 6);
        assert!(m.values.iter().flatten().all(|v| *v == 0.0));

        let varied = vec![scored(0.2), scored(0.5), scored(0.9)];
        let m = correlations(&varied);
        assert!((m.values[0][5] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejection_counts() {
        let reason = |category, severity| RejectionReason {
            category,
            criterion: "x".into(),
            actual: 0.1,
            required: 0.5,
            severity,
        };
        let rejected = vec![RejectedName {
            name: "Bad".into(),
            score: 0.1,
            reasons: vec![
                reason(RejectionCategory::OverallScore, Severity::Critical),
                reason(RejectionCategory::Dimensional, Severity::Major),
                reason(RejectionCategory::Dimensional, Severity::Minor),
            ],
            improvement_potential: 0.0,
            near_miss_factors: vec![],
        }];
        let s = rejection_summary(&rejected);
        assert_eq!(s.by_category["dimensional"], 2);
        assert_eq!(s.by_category["overall_score"], 1);
        assert_eq!(s.by_severity["critical"], 1);
    }

    #[test]
    fn test_non_finite_scores_degrade_to_default() {
        let mut bad = scored(0.5);
        bad.overall_score = f64::NAN;
        let analytics = build_analytics(&[bad], &outcome(), ThresholdMode::Moderate, PositioningSummary::default());
        assert_eq!(analytics, Analytics::default());

        let analytics = build_analytics(&[scored(0.5)], &outcome(), ThresholdMode::Moderate, PositioningSummary::default());
        assert_eq!(analytics.gate.mode, "moderate");
        assert_eq!(analytics.gate.threshold_used, 0.6);
        assert!((analytics.mean_confidence - 0.8).abs() < 1e-12);
    }
}
