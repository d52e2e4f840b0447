//! Gate filter
//!
//! Checks every candidate against the current bounds and exclusion criteria
//! and explains each failure. Rejection uses strict `<` (or `>` for upper
//! bounds): a value exactly on a bound passes, including values that differ
//! from the bound only by float rounding.

use crate::models::{
    ExclusionCriteria, RejectedName, RejectionCategory, RejectionReason, ScoreField,
    ScoredCandidate, Severity, ThresholdConfig,
};
use std::collections::BTreeMap;

/// Failures closer than this to their bound are near misses
pub const NEAR_MISS_GAP: f64 = 0.05;
/// Gap above which a non-critical failure is major
const MAJOR_GAP: f64 = 0.1;
/// Float slack when comparing gaps with the constants above
const GAP_EPSILON: f64 = 1e-9;
/// Computed bounds such as `0.30 + 0.05` carry rounding noise
const BOUND_EPSILON: f64 = 1e-9;

fn below(actual: f64, bound: f64) -> bool {
    actual < bound - BOUND_EPSILON
}

fn above(actual: f64, bound: f64) -> bool {
    actual > bound + BOUND_EPSILON
}

pub const CRITERION_OVERALL: &str = "overall_score";
pub const CRITERION_BALANCE: &str = "balance";
pub const CRITERION_PRONUNCIATION_DIFFICULTY: &str = "pronunciation_difficulty";
pub const CRITERION_MEMORABILITY_EXCLUSION: &str = "memorability_exclusion";
pub const CRITERION_CULTURAL_EXCLUSION: &str = "cultural_appeal_exclusion";
pub const CRITERION_NAME_LENGTH: &str = "name_length";

/// The adjustable part of the gate; fallback lowers or relaxes it
#[derive(Debug, Clone, PartialEq)]
pub struct GateBounds {
    pub threshold: f64,
    pub minimums: BTreeMap<ScoreField, f64>,
    pub balance_floor: f64,
}

impl GateBounds {
    pub fn from_config(config: &ThresholdConfig) -> Self {
        Self {
            threshold: config.threshold,
            minimums: config.dimensional_minimums.clone(),
            balance_floor: config.balance_floor,
        }
    }

    /// Scale every dimensional minimum and the balance floor
    pub fn relaxed(&self, factor: f64) -> Self {
        Self {
            threshold: self.threshold,
            minimums: self
                .minimums
                .iter()
                .map(|(f, v)| (*f, (v * factor).clamp(0.0, 1.0)))
                .collect(),
            balance_floor: (self.balance_floor * factor).clamp(0.0, 1.0),
        }
    }
}

/// Candidates split by the gate; both lists keep input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterResult {
    pub qualified: Vec<ScoredCandidate>,
    pub rejected: Vec<RejectedName>,
}

fn by_gap(gap: f64) -> Severity {
    if gap > MAJOR_GAP + GAP_EPSILON {
        Severity::Major
    } else {
        Severity::Minor
    }
}

fn reason(
    category: RejectionCategory,
    criterion: &str,
    actual: f64,
    required: f64,
    severity: Severity,
) -> RejectionReason {
    RejectionReason {
        category,
        criterion: criterion.to_string(),
        actual,
        required,
        severity,
    }
}

/// Every failed check for one candidate; empty means qualified
pub fn check(
    candidate: &ScoredCandidate,
    bounds: &GateBounds,
    exclusions: &ExclusionCriteria,
) -> Vec<RejectionReason> {
    let mut reasons = Vec::new();
    let b = &candidate.breakdown;

    if below(candidate.overall_score, bounds.threshold) {
        reasons.push(reason(
            RejectionCategory::OverallScore,
            CRITERION_OVERALL,
            candidate.overall_score,
            bounds.threshold,
            Severity::Critical,
        ));
    }

    for (field, &minimum) in &bounds.minimums {
        let actual = b.get(*field);
        if below(actual, minimum) {
            let severity = if *field == ScoreField::Appropriateness {
                Severity::Critical
            } else {
                by_gap(minimum - actual)
            };
            reasons.push(reason(
                RejectionCategory::Dimensional,
                field.as_str(),
                actual,
                minimum,
                severity,
            ));
        }
    }

    let balance = candidate.quality_vector.balance;
    if below(balance, bounds.balance_floor) {
        reasons.push(reason(
            RejectionCategory::Balance,
            CRITERION_BALANCE,
            balance,
            bounds.balance_floor,
            by_gap(bounds.balance_floor - balance),
        ));
    }

    let difficulty = 1.0 - b.pronunciation;
    if above(difficulty, exclusions.max_pronunciation_difficulty) {
        reasons.push(reason(
            RejectionCategory::Exclusion,
            CRITERION_PRONUNCIATION_DIFFICULTY,
            difficulty,
            exclusions.max_pronunciation_difficulty,
            by_gap(difficulty - exclusions.max_pronunciation_difficulty),
        ));
    }
    if below(b.memorability, exclusions.min_memorability) {
        reasons.push(reason(
            RejectionCategory::Exclusion,
            CRITERION_MEMORABILITY_EXCLUSION,
            b.memorability,
            exclusions.min_memorability,
            by_gap(exclusions.min_memorability - b.memorability),
        ));
    }
    if below(b.cultural_appeal, exclusions.min_cultural_appeal) {
        reasons.push(reason(
            RejectionCategory::Exclusion,
            CRITERION_CULTURAL_EXCLUSION,
            b.cultural_appeal,
            exclusions.min_cultural_appeal,
            Severity::Critical,
        ));
    }

    let length = candidate.name.chars().count();
    let bound = if length < exclusions.min_length {
        Some(exclusions.min_length)
    } else if length > exclusions.max_length {
        Some(exclusions.max_length)
    } else {
        None
    };
    if let Some(bound) = bound {
        reasons.push(reason(
            RejectionCategory::Exclusion,
            CRITERION_NAME_LENGTH,
            length as f64,
            bound as f64,
            Severity::Minor,
        ));
    }

    reasons
}

/// `max(0, 1 - 2 * total gap)`
pub fn improvement_potential(reasons: &[RejectionReason]) -> f64 {
    let total: f64 = reasons.iter().map(RejectionReason::gap).sum();
    (1.0 - 2.0 * total).max(0.0)
}

/// Criteria missed by no more than `NEAR_MISS_GAP`
pub fn near_miss_factors(reasons: &[RejectionReason]) -> Vec<String> {
    reasons
        .iter()
        .filter(|r| r.gap() <= NEAR_MISS_GAP + GAP_EPSILON)
        .map(|r| r.criterion.clone())
        .collect()
}

/// Build the rejection record for a candidate
pub fn rejected_name(candidate: &ScoredCandidate, reasons: Vec<RejectionReason>) -> RejectedName {
    RejectedName {
        name: candidate.name.clone(),
        score: candidate.overall_score,
        improvement_potential: improvement_potential(&reasons),
        near_miss_factors: near_miss_factors(&reasons),
        reasons,
    }
}

/// Split candidates into qualified and rejected
pub fn filter(
    candidates: &[ScoredCandidate],
    bounds: &GateBounds,
    exclusions: &ExclusionCriteria,
) -> FilterResult {
    let mut result = FilterResult::default();
    for candidate in candidates {
        let reasons = check(candidate, bounds, exclusions);
        if reasons.is_empty() {
            result.qualified.push(candidate.clone());
        } else {
            result.rejected.push(rejected_name(candidate, reasons));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::quality_vector;
    use crate::models::ScoreBreakdown;

    fn candidate(name: &str, breakdown: ScoreBreakdown) -> ScoredCandidate {
        ScoredCandidate {
            name: name.to_string(),
            quality_vector: quality_vector(&breakdown, 0.5),
            overall_score: breakdown.weighted_overall(),
            breakdown,
            confidence: 1.0,
            analysis_time_ms: 0,
            missing_fields: vec![],
        }
    }

    fn bounds(threshold: f64) -> GateBounds {
        let mut minimums = BTreeMap::new();
        minimums.insert(ScoreField::Memorability, 0.35);
        minimums.insert(ScoreField::Appropriateness, 0.40);
        GateBounds {
            threshold,
            minimums,
            balance_floor: 0.30,
        }
    }

    #[test]
    fn test_values_on_bounds_pass() {
        let mut b = ScoreBreakdown::uniform(0.6);
        b.set(ScoreField::Memorability, 0.35);
        b.set(ScoreField::Appropriateness, 0.40);
        let c = candidate("Edge Case", b);
        let reasons = check(&c, &bounds(c.overall_score), &ExclusionCriteria::default());
        assert!(reasons.is_empty(), "{:?}", reasons);
    }

    #[test]
    fn test_severity_rules() {
        let mut b = ScoreBreakdown::uniform(0.6);
        b.set(ScoreField::Memorability, 0.30);
        b.set(ScoreField::Appropriateness, 0.39);
        b.set(ScoreField::CulturalAppeal, 0.24);
        let c = candidate("X", b);
        let reasons = check(&c, &bounds(0.9), &ExclusionCriteria::default());

        let severity_of = |criterion: &str| {
            reasons
                .iter()
                .find(|r| r.criterion == criterion)
                .map(|r| r.severity)
        };
        assert_eq!(severity_of(CRITERION_OVERALL), Some(Severity::Critical));
        assert_eq!(severity_of("appropriateness"), Some(Severity::Critical));
        assert_eq!(severity_of("memorability"), Some(Severity::Minor));
        assert_eq!(severity_of(CRITERION_CULTURAL_EXCLUSION), Some(Severity::Critical));
        assert_eq!(severity_of(CRITERION_NAME_LENGTH), Some(Severity::Minor));
    }

    #[test]
    fn test_large_dimensional_gap_is_major() {
        let mut b = ScoreBreakdown::uniform(0.9);
        b.set(ScoreField::Memorability, 0.2);
        let c = candidate("Big Gap", b);
        let reasons = check(&c, &bounds(0.2), &ExclusionCriteria::default());
        let r = reasons.iter().find(|r| r.criterion == "memorability").unwrap();
        assert_eq!(r.severity, Severity::Major);
    }

    #[test]
    fn test_improvement_potential_and_near_misses() {
        let c = candidate("Near Miss", ScoreBreakdown::uniform(0.62));
        let r = filter(&[c], &bounds(0.65), &ExclusionCriteria::default());
        assert!(r.qualified.is_empty());
        let rejected = &r.rejected[0];
        assert_eq!(rejected.near_miss_factors, vec![CRITERION_OVERALL.to_string()]);
        assert!((rejected.improvement_potential - (1.0 - 2.0 * 0.03)).abs() < 1e-9);
    }

    #[test]
    fn test_relaxed_bounds() {
        let relaxed = bounds(0.5).relaxed(0.8);
        assert!((relaxed.minimums[&ScoreField::Memorability] - 0.28).abs() < 1e-12);
        assert!((relaxed.balance_floor - 0.24).abs() < 1e-12);
        assert_eq!(relaxed.threshold, 0.5);
    }
}
