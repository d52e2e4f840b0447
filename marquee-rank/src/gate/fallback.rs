//! Emergency fallback
//!
//! Bounded escalation when too few candidates pass the gate. The threshold
//! is lowered in fixed steps down to the floor and never below it. If that is
//! still not enough, the dimensional minimums and balance floor are relaxed
//! once. Whatever qualifies after that is returned as is.

use super::filter::{filter, FilterResult, GateBounds};
use crate::models::{ExclusionCriteria, FallbackReport, FallbackSettings, FallbackStep, ScoredCandidate};
use tracing::{debug, info, warn};

/// Factor applied to minimums and the balance floor in the relax step
pub const RELAX_FACTOR: f64 = 0.8;

/// State after the fallback ran
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackResult {
    pub filtered: FilterResult,
    pub bounds: GateBounds,
    pub report: FallbackReport,
}

/// Round away float drift so repeated stepping lands on clean values
fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Run the fallback starting from an initial filter pass
///
/// `target` is the number of qualified candidates wanted, already capped at
/// the batch size.
pub fn run_fallback(
    candidates: &[ScoredCandidate],
    bounds: GateBounds,
    initial: FilterResult,
    settings: &FallbackSettings,
    exclusions: &ExclusionCriteria,
    target: usize,
) -> FallbackResult {
    let mut report = FallbackReport::default();
    if !settings.enabled || initial.qualified.len() >= target {
        return FallbackResult {
            filtered: initial,
            bounds,
            report,
        };
    }

    report.triggered = true;
    info!(
        qualified = initial.qualified.len(),
        target,
        threshold = bounds.threshold,
        "Emergency fallback triggered"
    );

    let mut bounds = bounds;
    let mut filtered = initial;
    let mut lowered = 0usize;

    while filtered.qualified.len() < target
        && bounds.threshold > settings.floor
        && lowered < settings.max_steps
    {
        let from = bounds.threshold;
        let to = round6((from - settings.step).max(settings.floor));
        bounds.threshold = to;
        filtered = filter(candidates, &bounds, exclusions);
        lowered += 1;
        debug!(from, to, qualified = filtered.qualified.len(), "Fallback lowered threshold");
        report.steps.push(FallbackStep::LowerThreshold {
            from,
            to,
            qualified: filtered.qualified.len(),
        });
    }

    if filtered.qualified.len() < target {
        bounds = bounds.relaxed(RELAX_FACTOR);
        filtered = filter(candidates, &bounds, exclusions);
        debug!(qualified = filtered.qualified.len(), "Fallback relaxed dimensional minimums");
        report.steps.push(FallbackStep::RelaxMinimums {
            factor: RELAX_FACTOR,
            qualified: filtered.qualified.len(),
        });
    }

    if filtered.qualified.len() < target {
        report.exhausted = true;
        warn!(
            qualified = filtered.qualified.len(),
            target,
            threshold = bounds.threshold,
            "Fallback exhausted; returning fewer results than requested"
        );
    }

    FallbackResult {
        filtered,
        bounds,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::quality_vector;
    use crate::models::{ScoreBreakdown, ScoreField};
    use std::collections::BTreeMap;

    fn batch(scores: &[f64]) -> Vec<ScoredCandidate> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let breakdown = ScoreBreakdown::uniform(s);
                ScoredCandidate {
                    name: format!("Name {}", i),
                    quality_vector: quality_vector(&breakdown, 0.5),
                    overall_score: breakdown.weighted_overall(),
                    breakdown,
                    confidence: 1.0,
                    analysis_time_ms: 0,
                    missing_fields: vec![],
                }
            })
            .collect()
    }

    fn bounds(threshold: f64) -> GateBounds {
        GateBounds {
            threshold,
            minimums: BTreeMap::new(),
            balance_floor: 0.3,
        }
    }

    fn run(candidates: &[ScoredCandidate], b: GateBounds, target: usize) -> FallbackResult {
        let exclusions = ExclusionCriteria::default();
        let initial = filter(candidates, &b, &exclusions);
        run_fallback(candidates, b, initial, &FallbackSettings::default(), &exclusions, target)
    }

    #[test]
    fn test_not_triggered_when_target_met() {
        let c = batch(&[0.9, 0.85, 0.8]);
        let r = run(&c, bounds(0.7), 3);
        assert!(!r.report.triggered);
        assert!(r.report.steps.is_empty());
        assert_eq!(r.bounds.threshold, 0.7);
    }

    #[test]
    fn test_lowers_until_target_met() {
        let c = batch(&[0.95, 0.89, 0.83, 0.77, 0.71, 0.65]);
        let r = run(&c, bounds(0.80), 5);
        assert!(r.report.triggered);
        assert!(!r.report.exhausted);
        assert_eq!(r.filtered.qualified.len(), 5);
        assert_eq!(r.bounds.threshold, 0.70);
        assert_eq!(r.report.steps.len(), 2);
    }

    #[test]
    fn test_never_crosses_floor() {
        let c = batch(&[0.9, 0.28, 0.27]);
        let r = run(&c, bounds(0.42), 3);
        assert!(r.report.exhausted);
        assert_eq!(r.bounds.threshold, 0.30);
        let last_lower = r
            .report
            .steps
            .iter()
            .filter_map(|s| match s {
                FallbackStep::LowerThreshold { to, .. } => Some(*to),
                _ => None,
            })
            .last();
        assert_eq!(last_lower, Some(0.30));
        assert!(matches!(r.report.steps.last(), Some(FallbackStep::RelaxMinimums { .. })));
        assert_eq!(r.filtered.qualified.len(), 1);
    }

    #[test]
    fn test_relax_step_admits_dimensional_failures() {
        let mut c = batch(&[0.9, 0.9]);
        c[1].breakdown.set(ScoreField::Creativity, 0.42);
        let mut b = bounds(0.30);
        b.minimums.insert(ScoreField::Creativity, 0.50);
        let r = run(&c, b, 2);
        assert_eq!(r.filtered.qualified.len(), 2);
        assert_eq!(r.report.steps.len(), 1);
        assert!((r.bounds.minimums[&ScoreField::Creativity] - 0.40).abs() < 1e-12);
    }

    #[test]
    fn test_disabled_fallback_does_nothing() {
        let c = batch(&[0.5]);
        let exclusions = ExclusionCriteria::default();
        let b = bounds(0.9);
        let initial = filter(&c, &b, &exclusions);
        let settings = FallbackSettings {
            enabled: false,
            ..Default::default()
        };
        let r = run_fallback(&c, b, initial, &settings, &exclusions, 1);
        assert!(!r.report.triggered);
        assert!(r.filtered.qualified.is_empty());
    }
}
