//! Threshold computation
//!
//! Builds the `ThresholdConfig` for one request: base threshold by mode,
//! contextual offsets, the adaptive preference offset, dimensional minimums,
//! balance floor and exclusion criteria.

use super::offsets::{contextual_offset, preference_offset};
use super::GateError;
use crate::models::gate::{THRESHOLD_MAX, THRESHOLD_MIN};
use crate::models::{
    Audience, ExclusionCriteria, FallbackSettings, Genre, NameContext, NameType, ScoreField,
    ThresholdConfig, ThresholdMode, UserPreferences,
};
use std::collections::BTreeMap;

/// Adaptive base when no history exists
pub const DEFAULT_ADAPTIVE_BASE: f64 = 0.65;

/// Base threshold for a mode; adaptive returns the no-history default
pub fn mode_base(mode: ThresholdMode) -> f64 {
    match mode {
        ThresholdMode::Strict => 0.80,
        ThresholdMode::Moderate => 0.65,
        ThresholdMode::Lenient => 0.50,
        ThresholdMode::Custom(value) => value,
        ThresholdMode::Adaptive => DEFAULT_ADAPTIVE_BASE,
    }
}

/// Everything the threshold computation depends on
#[derive(Debug, Clone)]
pub struct ThresholdInputs<'a> {
    pub mode: ThresholdMode,
    pub context: &'a NameContext,
    pub preferences: &'a UserPreferences,
    /// Learned threshold for the context key (adaptive mode only)
    pub learned: Option<f64>,
    pub stability_factor: f64,
    pub exclusions: ExclusionCriteria,
    pub fallback: FallbackSettings,
}

/// Compute the full gate configuration
///
/// # Errors
/// `GateError` when any intermediate value is non-finite or the fallback
/// settings are unusable.
pub fn compute_threshold(inputs: &ThresholdInputs<'_>) -> Result<ThresholdConfig, GateError> {
    validate_fallback(&inputs.fallback)?;

    let base = match (inputs.mode, inputs.learned) {
        (ThresholdMode::Adaptive, Some(learned)) => {
            let s = inputs.stability_factor;
            s * DEFAULT_ADAPTIVE_BASE + (1.0 - s) * learned
        }
        (mode, _) => mode_base(mode),
    };
    ensure_finite("base threshold", base)?;

    let mut threshold = base + contextual_offset(inputs.context);
    if inputs.mode == ThresholdMode::Adaptive {
        threshold += preference_offset(inputs.preferences);
    }
    ensure_finite("threshold", threshold)?;

    Ok(ThresholdConfig {
        mode: inputs.mode,
        context: inputs.context.clone(),
        base_threshold: base,
        threshold: threshold.clamp(THRESHOLD_MIN, THRESHOLD_MAX),
        dimensional_minimums: dimensional_minimums(inputs.mode, inputs.context),
        balance_floor: balance_floor(inputs.mode),
        exclusion_criteria: inputs.exclusions.clone(),
        fallback: inputs.fallback.clone(),
    })
}

/// Per-field minimums for a mode and context
pub fn dimensional_minimums(mode: ThresholdMode, ctx: &NameContext) -> BTreeMap<ScoreField, f64> {
    let shift = match mode {
        ThresholdMode::Strict => 0.10,
        ThresholdMode::Lenient => -0.10,
        _ => 0.0,
    };

    let mut minimums = BTreeMap::new();
    for field in [
        ScoreField::PhoneticFlow,
        ScoreField::SemanticCoherence,
        ScoreField::Memorability,
        ScoreField::Pronunciation,
        ScoreField::Creativity,
    ] {
        minimums.insert(field, 0.30 + shift);
    }
    minimums.insert(ScoreField::Appropriateness, 0.40 + shift);

    let bump = |m: &mut BTreeMap<ScoreField, f64>, field: ScoreField, by: f64| {
        if let Some(v) = m.get_mut(&field) {
            *v += by;
        }
    };
    match ctx.name_type {
        NameType::Band => bump(&mut minimums, ScoreField::Memorability, 0.05),
        NameType::Song => bump(&mut minimums, ScoreField::SemanticCoherence, 0.05),
    }
    if ctx.target_audience == Audience::Mainstream {
        minimums.insert(ScoreField::MarketAppeal, 0.40);
    }
    if ctx.genre == Genre::Experimental {
        bump(&mut minimums, ScoreField::Creativity, 0.10);
    }

    for v in minimums.values_mut() {
        *v = v.clamp(0.0, 1.0);
    }
    minimums
}

pub fn balance_floor(mode: ThresholdMode) -> f64 {
    match mode {
        ThresholdMode::Strict => 0.40,
        ThresholdMode::Lenient => 0.20,
        _ => 0.30,
    }
}

fn ensure_finite(what: &'static str, value: f64) -> Result<(), GateError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GateError::NonFinite { what, value })
    }
}

fn validate_fallback(f: &FallbackSettings) -> Result<(), GateError> {
    if !f.step.is_finite() || f.step <= 0.0 {
        return Err(GateError::InvalidConfig(format!(
            "fallback step must be positive, got {}",
            f.step
        )));
    }
    if !f.floor.is_finite() {
        return Err(GateError::NonFinite {
            what: "fallback floor",
            value: f.floor,
        });
    }
    if !(THRESHOLD_MIN..=THRESHOLD_MAX).contains(&f.floor) {
        return Err(GateError::InvalidConfig(format!(
            "fallback floor must lie in [{}, {}], got {}",
            THRESHOLD_MIN, THRESHOLD_MAX, f.floor
        )));
    }
    Ok(())
}
