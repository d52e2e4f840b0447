//! Mode weights and preference adjustments for the final ranking score

use crate::math::mean;
use crate::models::{RankingMode, RiskTolerance, ScoredCandidate, UserPreferences};

/// Largest correction any single preference rule may apply
pub const MAX_RULE_ADJUSTMENT: f64 = 0.05;

/// Weight vector over the six ranking factors; each mode's weights sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeWeights {
    pub quality: f64,
    pub competitiveness: f64,
    pub creativity: f64,
    pub marketability: f64,
    pub contextual_fit: f64,
    pub uniqueness: f64,
}

impl ModeWeights {
    pub fn for_mode(mode: RankingMode) -> Self {
        let (quality, competitiveness, creativity, marketability, contextual_fit, uniqueness) = match mode {
            RankingMode::Comprehensive => (0.30, 0.15, 0.15, 0.15, 0.15, 0.10),
            RankingMode::Contextual => (0.25, 0.10, 0.10, 0.10, 0.35, 0.10),
            RankingMode::MarketFocused => (0.25, 0.15, 0.05, 0.40, 0.10, 0.05),
            RankingMode::CreativeFirst => (0.20, 0.10, 0.35, 0.05, 0.05, 0.25),
            RankingMode::Balanced => (0.20, 0.16, 0.16, 0.16, 0.16, 0.16),
        };
        Self {
            quality,
            competitiveness,
            creativity,
            marketability,
            contextual_fit,
            uniqueness,
        }
    }

    pub fn total(&self) -> f64 {
        self.quality
            + self.competitiveness
            + self.creativity
            + self.marketability
            + self.contextual_fit
            + self.uniqueness
    }
}

/// Factor values of one candidate, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingFactors {
    pub quality: f64,
    pub competitiveness: f64,
    pub creativity: f64,
    pub marketability: f64,
    pub contextual_fit: f64,
    pub uniqueness: f64,
}

impl RankingFactors {
    pub fn of(candidate: &ScoredCandidate, percentile: f64) -> Self {
        let b = &candidate.breakdown;
        Self {
            quality: candidate.overall_score,
            competitiveness: percentile,
            creativity: b.creativity,
            marketability: mean(&[b.market_appeal, b.memorability]),
            contextual_fit: candidate.quality_vector.fit,
            uniqueness: b.uniqueness,
        }
    }

    pub fn weighted(&self, w: &ModeWeights) -> f64 {
        self.quality * w.quality
            + self.competitiveness * w.competitiveness
            + self.creativity * w.creativity
            + self.marketability * w.marketability
            + self.contextual_fit * w.contextual_fit
            + self.uniqueness * w.uniqueness
    }
}

fn bounded(x: f64) -> f64 {
    x.clamp(-MAX_RULE_ADJUSTMENT, MAX_RULE_ADJUSTMENT)
}

/// Sum of the preference rules for one candidate
///
/// - risk tolerance: conservative -0.05 when uniqueness > 0.8, adventurous
///   +0.05 when uniqueness > 0.7
/// - short names: +0.03 for at most two words, -0.03 for more than three
/// - memorability emphasis: 0.10 * (memorability - 0.5)
pub fn preference_adjustment(candidate: &ScoredCandidate, prefs: &UserPreferences) -> f64 {
    let uniqueness = candidate.breakdown.uniqueness;
    let risk = match prefs.risk_tolerance {
        RiskTolerance::Conservative if uniqueness > 0.8 => -MAX_RULE_ADJUSTMENT,
        RiskTolerance::Adventurous if uniqueness > 0.7 => MAX_RULE_ADJUSTMENT,
        _ => 0.0,
    };

    let short = if prefs.prefers_short_names {
        match candidate.name.split_whitespace().count() {
            0..=2 => 0.03,
            3 => 0.0,
            _ => -0.03,
        }
    } else {
        0.0
    };

    let memorability = if prefs.emphasize_memorability {
        0.10 * (candidate.breakdown.memorability - 0.5)
    } else {
        0.0
    };

    bounded(risk) + bounded(short) + bounded(memorability)
}

/// Mode-weighted score plus preference adjustments, clamped to [0, 1]
pub fn final_score(
    candidate: &ScoredCandidate,
    percentile: f64,
    mode: RankingMode,
    prefs: &UserPreferences,
) -> f64 {
    let base = RankingFactors::of(candidate, percentile).weighted(&ModeWeights::for_mode(mode));
    crate::math::unit(base + preference_adjustment(candidate, prefs), 0.0)
}
