//! Quality threshold manager
//!
//! Owns the gate settings and the optional learning store, and runs the
//! threshold, filter and fallback stages for one batch.

use super::fallback::run_fallback;
use super::filter::{filter, rejected_name, GateBounds};
use super::threshold::{compute_threshold, mode_base, ThresholdInputs, DEFAULT_ADAPTIVE_BASE};
use crate::learning::{learned_threshold_for, AdaptiveSettings, LearningOutcome, LearningRecord, LearningStore};
use crate::math::mean;
use crate::models::gate::{THRESHOLD_MAX, THRESHOLD_MIN};
use crate::models::{
    ExclusionCriteria, FallbackReport, FallbackSettings, GateOutcome, NameContext,
    RejectionCategory, RejectionReason, ScoredCandidate, Severity, ThresholdMode, UserPreferences,
};
use marquee_common::config::{GateSettings, LearningSettings};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Criterion attached to candidates rejected by the emergency path
pub const CRITERION_GATE_UNAVAILABLE: &str = "quality_gate_unavailable";

impl From<&GateSettings> for FallbackSettings {
    fn from(s: &GateSettings) -> Self {
        Self {
            enabled: s.fallback_enabled,
            minimum_results: s.minimum_results,
            step: s.fallback_step,
            floor: s.fallback_floor,
            max_steps: s.max_fallback_steps,
            emergency_result_count: s.emergency_result_count,
        }
    }
}

/// Per-request gate parameters
#[derive(Debug, Clone)]
pub struct GateRequest<'a> {
    pub mode: ThresholdMode,
    pub context: &'a NameContext,
    pub preferences: &'a UserPreferences,
    /// Overrides the configured minimum result count
    pub minimum_results: Option<usize>,
}

pub struct QualityThresholdManager {
    fallback: FallbackSettings,
    exclusions: ExclusionCriteria,
    adaptive: AdaptiveSettings,
    learning: Option<Arc<dyn LearningStore>>,
}

impl QualityThresholdManager {
    pub fn new(fallback: FallbackSettings, exclusions: ExclusionCriteria, adaptive: AdaptiveSettings) -> Self {
        Self {
            fallback,
            exclusions,
            adaptive,
            learning: None,
        }
    }

    pub fn from_settings(gate: &GateSettings, learning: &LearningSettings) -> Self {
        Self::new(
            FallbackSettings::from(gate),
            ExclusionCriteria::default(),
            AdaptiveSettings::from(learning),
        )
    }

    /// Attach the history used by adaptive mode
    pub fn with_learning_store(mut self, store: Arc<dyn LearningStore>) -> Self {
        self.learning = Some(store);
        self
    }

    pub fn fallback_settings(&self) -> &FallbackSettings {
        &self.fallback
    }

    /// Run the gate over a batch
    pub async fn evaluate(&self, request: &GateRequest<'_>, candidates: &[ScoredCandidate]) -> GateOutcome {
        let learned = match (request.mode, &self.learning) {
            (ThresholdMode::Adaptive, Some(store)) => {
                let key = request.context.learning_key();
                match learned_threshold_for(store, &key, marquee_common::time::now(), &self.adaptive).await {
                    Ok(learned) => learned,
                    Err(e) => {
                        warn!(context_key = %key, error = %e, "Failed to load learning history; using default base");
                        None
                    }
                }
            }
            _ => None,
        };
        self.evaluate_with(request, learned, candidates)
    }

    /// Run the gate with an already resolved learned threshold
    pub fn evaluate_with(
        &self,
        request: &GateRequest<'_>,
        learned: Option<f64>,
        candidates: &[ScoredCandidate],
    ) -> GateOutcome {
        let inputs = ThresholdInputs {
            mode: request.mode,
            context: request.context,
            preferences: request.preferences,
            learned,
            stability_factor: self.adaptive.stability_factor,
            exclusions: self.exclusions.clone(),
            fallback: self.fallback.clone(),
        };

        let config = match compute_threshold(&inputs) {
            Ok(config) => config,
            Err(e) => {
                warn!(mode = request.mode.as_str(), error = %e, "Quality gate failed; using emergency selection");
                return self.emergency_outcome(request.mode, candidates);
            }
        };

        let bounds = GateBounds::from_config(&config);
        let initial = filter(candidates, &bounds, &config.exclusion_criteria);
        debug!(
            mode = request.mode.as_str(),
            threshold = config.threshold,
            qualified = initial.qualified.len(),
            rejected = initial.rejected.len(),
            "Initial gate pass"
        );

        let minimum = request.minimum_results.unwrap_or(self.fallback.minimum_results);
        let target = minimum.min(candidates.len());
        let result = run_fallback(
            candidates,
            bounds,
            initial,
            &config.fallback,
            &config.exclusion_criteria,
            target,
        );

        info!(
            threshold_initial = config.threshold,
            threshold_used = result.bounds.threshold,
            qualified = result.filtered.qualified.len(),
            rejected = result.filtered.rejected.len(),
            fallback = result.report.triggered,
            "Quality gate complete"
        );

        GateOutcome {
            qualified: result.filtered.qualified,
            rejected: result.filtered.rejected,
            initial_threshold: config.threshold,
            threshold_used: result.bounds.threshold,
            threshold_offset: config.threshold - config.base_threshold,
            fallback: result.report,
            emergency: false,
        }
    }

    /// Top candidates by raw overall score, everything else rejected
    fn emergency_outcome(&self, mode: ThresholdMode, candidates: &[ScoredCandidate]) -> GateOutcome {
        let base = mode_base(mode);
        let threshold = if base.is_finite() {
            base.clamp(THRESHOLD_MIN, THRESHOLD_MAX)
        } else {
            DEFAULT_ADAPTIVE_BASE
        };

        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by(|&a, &b| {
            candidates[b]
                .overall_score
                .total_cmp(&candidates[a].overall_score)
        });
        let keep = self.fallback.emergency_result_count.min(candidates.len());
        let mut admitted = vec![false; candidates.len()];
        for &i in &order[..keep] {
            admitted[i] = true;
        }
        let lowest_admitted = order[..keep]
            .iter()
            .map(|&i| candidates[i].overall_score)
            .fold(f64::INFINITY, f64::min);
        let required = if lowest_admitted.is_finite() { lowest_admitted } else { 0.0 };

        let mut qualified = Vec::with_capacity(keep);
        let mut rejected = Vec::new();
        for (candidate, admitted) in candidates.iter().zip(admitted) {
            if admitted {
                qualified.push(candidate.clone());
            } else {
                let reason = RejectionReason {
                    category: RejectionCategory::Fallback,
                    criterion: CRITERION_GATE_UNAVAILABLE.to_string(),
                    actual: candidate.overall_score,
                    required,
                    severity: Severity::Critical,
                };
                rejected.push(rejected_name(candidate, vec![reason]));
            }
        }

        GateOutcome {
            qualified,
            rejected,
            initial_threshold: threshold,
            threshold_used: threshold,
            threshold_offset: 0.0,
            fallback: FallbackReport::default(),
            emergency: true,
        }
    }

    /// Append the outcome to the learning history
    ///
    /// The recorded threshold has the request's offsets removed; they are
    /// added again when the learned base is used. Emergency outcomes carry no
    /// threshold signal and are skipped. Store errors are logged and
    /// otherwise ignored.
    pub async fn record_outcome(&self, context: &NameContext, outcome: &GateOutcome, user_satisfaction: Option<f64>) {
        let Some(store) = &self.learning else {
            return;
        };
        if outcome.emergency {
            debug!("Skipping learning record for emergency gate outcome");
            return;
        }

        let scores: Vec<f64> = outcome.qualified.iter().map(|c| c.overall_score).collect();
        let record = LearningRecord {
            context_key: context.learning_key(),
            threshold_used: outcome.threshold_used - outcome.threshold_offset,
            outcome: LearningOutcome {
                total: outcome.qualified.len() + outcome.rejected.len(),
                qualified: outcome.qualified.len(),
                mean_qualified_score: mean(&scores),
                user_satisfaction,
            },
            recorded_at: marquee_common::time::now(),
        };

        if let Err(e) = store.append(record).await {
            warn!(context_key = %context.learning_key(), error = %e, "Failed to record learning outcome");
        }
    }
}
