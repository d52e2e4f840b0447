//! Scored candidate model
//!
//! A `ScoreBreakdown` is the fully populated per-field view produced by the
//! aggregator; `QualityVector` condenses it into five comparison dimensions.
//! Both are built once and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Neutral value substituted for any field no analyzer reported
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Named sub-score of a `ScoreBreakdown`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreField {
    PhoneticFlow,
    SemanticCoherence,
    Creativity,
    Memorability,
    MarketAppeal,
    Appropriateness,
    Uniqueness,
    Pronunciation,
    CulturalAppeal,
    GenreOptimization,
    PhoneticSemanticAlignment,
}

impl ScoreField {
    pub const ALL: [ScoreField; 11] = [
        ScoreField::PhoneticFlow,
        ScoreField::SemanticCoherence,
        ScoreField::Creativity,
        ScoreField::Memorability,
        ScoreField::MarketAppeal,
        ScoreField::Appropriateness,
        ScoreField::Uniqueness,
        ScoreField::Pronunciation,
        ScoreField::CulturalAppeal,
        ScoreField::GenreOptimization,
        ScoreField::PhoneticSemanticAlignment,
    ];

    /// Weight of this field in `overall_score`; the weights sum to 1.0
    pub fn overall_weight(&self) -> f64 {
        match self {
            ScoreField::PhoneticFlow => 0.12,
            ScoreField::SemanticCoherence => 0.12,
            ScoreField::Creativity => 0.12,
            ScoreField::Memorability => 0.12,
            ScoreField::MarketAppeal => 0.10,
            ScoreField::Appropriateness => 0.08,
            ScoreField::Uniqueness => 0.10,
            ScoreField::Pronunciation => 0.08,
            ScoreField::CulturalAppeal => 0.06,
            ScoreField::GenreOptimization => 0.05,
            ScoreField::PhoneticSemanticAlignment => 0.05,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreField::PhoneticFlow => "phonetic_flow",
            ScoreField::SemanticCoherence => "semantic_coherence",
            ScoreField::Creativity => "creativity",
            ScoreField::Memorability => "memorability",
            ScoreField::MarketAppeal => "market_appeal",
            ScoreField::Appropriateness => "appropriateness",
            ScoreField::Uniqueness => "uniqueness",
            ScoreField::Pronunciation => "pronunciation",
            ScoreField::CulturalAppeal => "cultural_appeal",
            ScoreField::GenreOptimization => "genre_optimization",
            ScoreField::PhoneticSemanticAlignment => "phonetic_semantic_alignment",
        }
    }

    /// Human-readable label for explanations
    pub fn display_name(&self) -> &'static str {
        match self {
            ScoreField::PhoneticFlow => "phonetic flow",
            ScoreField::SemanticCoherence => "semantic coherence",
            ScoreField::Creativity => "creativity",
            ScoreField::Memorability => "memorability",
            ScoreField::MarketAppeal => "market appeal",
            ScoreField::Appropriateness => "appropriateness",
            ScoreField::Uniqueness => "uniqueness",
            ScoreField::Pronunciation => "pronunciation",
            ScoreField::CulturalAppeal => "cultural appeal",
            ScoreField::GenreOptimization => "genre fit",
            ScoreField::PhoneticSemanticAlignment => "sound-meaning alignment",
        }
    }
}

impl fmt::Display for ScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully populated sub-scores, every field in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub phonetic_flow: f64,
    pub semantic_coherence: f64,
    pub creativity: f64,
    pub memorability: f64,
    pub market_appeal: f64,
    pub appropriateness: f64,
    pub uniqueness: f64,
    pub pronunciation: f64,
    pub cultural_appeal: f64,
    pub genre_optimization: f64,
    pub phonetic_semantic_alignment: f64,
}

impl Default for ScoreBreakdown {
    fn default() -> Self {
        Self::uniform(NEUTRAL_SCORE)
    }
}

impl ScoreBreakdown {
    /// Every field set to the same value
    pub fn uniform(value: f64) -> Self {
        Self {
            phonetic_flow: value,
            semantic_coherence: value,
            creativity: value,
            memorability: value,
            market_appeal: value,
            appropriateness: value,
            uniqueness: value,
            pronunciation: value,
            cultural_appeal: value,
            genre_optimization: value,
            phonetic_semantic_alignment: value,
        }
    }

    pub fn get(&self, field: ScoreField) -> f64 {
        match field {
            ScoreField::PhoneticFlow => self.phonetic_flow,
            ScoreField::SemanticCoherence => self.semantic_coherence,
            ScoreField::Creativity => self.creativity,
            ScoreField::Memorability => self.memorability,
            ScoreField::MarketAppeal => self.market_appeal,
            ScoreField::Appropriateness => self.appropriateness,
            ScoreField::Uniqueness => self.uniqueness,
            ScoreField::Pronunciation => self.pronunciation,
            ScoreField::CulturalAppeal => self.cultural_appeal,
            ScoreField::GenreOptimization => self.genre_optimization,
            ScoreField::PhoneticSemanticAlignment => self.phonetic_semantic_alignment,
        }
    }

    pub fn set(&mut self, field: ScoreField, value: f64) {
        let slot = match field {
            ScoreField::PhoneticFlow => &mut self.phonetic_flow,
            ScoreField::SemanticCoherence => &mut self.semantic_coherence,
            ScoreField::Creativity => &mut self.creativity,
            ScoreField::Memorability => &mut self.memorability,
            ScoreField::MarketAppeal => &mut self.market_appeal,
            ScoreField::Appropriateness => &mut self.appropriateness,
            ScoreField::Uniqueness => &mut self.uniqueness,
            ScoreField::Pronunciation => &mut self.pronunciation,
            ScoreField::CulturalAppeal => &mut self.cultural_appeal,
            ScoreField::GenreOptimization => &mut self.genre_optimization,
            ScoreField::PhoneticSemanticAlignment => &mut self.phonetic_semantic_alignment,
        };
        *slot = crate::math::unit(value, NEUTRAL_SCORE);
    }

    /// Convex combination of all fields
    pub fn weighted_overall(&self) -> f64 {
        let total: f64 = ScoreField::ALL
            .iter()
            .map(|f| self.get(*f) * f.overall_weight())
            .sum();
        total.clamp(0.0, 1.0)
    }
}

/// Named comparison dimensions of a `QualityVector`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Sound,
    Meaning,
    Creativity,
    Appeal,
    Fit,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Sound,
        Dimension::Meaning,
        Dimension::Creativity,
        Dimension::Appeal,
        Dimension::Fit,
    ];

    /// Breakdown fields averaged into this dimension
    pub fn fields(&self) -> &'static [ScoreField] {
        match self {
            Dimension::Sound => &[ScoreField::PhoneticFlow, ScoreField::Pronunciation],
            Dimension::Meaning => &[
                ScoreField::SemanticCoherence,
                ScoreField::PhoneticSemanticAlignment,
            ],
            Dimension::Creativity => &[ScoreField::Creativity, ScoreField::Uniqueness],
            Dimension::Appeal => &[
                ScoreField::Memorability,
                ScoreField::MarketAppeal,
                ScoreField::CulturalAppeal,
            ],
            Dimension::Fit => &[ScoreField::GenreOptimization, ScoreField::Appropriateness],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Sound => "sound",
            Dimension::Meaning => "meaning",
            Dimension::Creativity => "creativity",
            Dimension::Appeal => "appeal",
            Dimension::Fit => "fit",
        }
    }
}

/// Five-dimension quality summary plus shape statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityVector {
    pub sound: f64,
    pub meaning: f64,
    pub creativity: f64,
    pub appeal: f64,
    pub fit: f64,
    /// 1 - scaled variance across the five dimensions
    pub balance: f64,
    /// Euclidean norm scaled into [0, 1]
    pub magnitude: f64,
    /// Mean cosine dissimilarity to co-batch peers
    pub distinctiveness: f64,
}

impl QualityVector {
    pub fn dimensions(&self) -> [f64; 5] {
        [self.sound, self.meaning, self.creativity, self.appeal, self.fit]
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Sound => self.sound,
            Dimension::Meaning => self.meaning,
            Dimension::Creativity => self.creativity,
            Dimension::Appeal => self.appeal,
            Dimension::Fit => self.fit,
        }
    }
}

/// One candidate after aggregation; immutable for the rest of the request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub name: String,
    pub breakdown: ScoreBreakdown,
    pub quality_vector: QualityVector,
    pub overall_score: f64,
    pub confidence: f64,
    /// Wall-clock analysis time; diagnostics only
    pub analysis_time_ms: u64,
    /// Fields no analyzer reported (filled with the neutral default)
    pub missing_fields: Vec<ScoreField>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_weights_sum_to_one() {
        let total: f64 = ScoreField::ALL.iter().map(|f| f.overall_weight()).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_breakdown_overall_equals_value() {
        let b = ScoreBreakdown::uniform(0.73);
        assert!((b.weighted_overall() - 0.73).abs() < 1e-12);
    }

    #[test]
    fn test_set_clamps_and_rejects_nan() {
        let mut b = ScoreBreakdown::default();
        b.set(ScoreField::Creativity, 1.7);
        b.set(ScoreField::Uniqueness, f64::NAN);
        assert_eq!(b.creativity, 1.0);
        assert_eq!(b.uniqueness, NEUTRAL_SCORE);
    }

    #[test]
    fn test_every_field_belongs_to_a_dimension() {
        for field in ScoreField::ALL {
            let owners = Dimension::ALL
                .iter()
                .filter(|d| d.fields().contains(&field))
                .count();
            assert_eq!(owners, 1, "{} should map to exactly one dimension", field);
        }
    }
}
