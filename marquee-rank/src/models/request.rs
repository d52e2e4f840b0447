//! Ranking request: wire shape and validated form
//!
//! `RankingRequest` mirrors the JSON a caller sends (camelCase, loosely typed
//! strings). `RankingRequest::validate` is the only way to obtain a
//! `ValidatedRequest`, and it is where every configuration error is raised.
//! Nothing downstream re-checks these values.

use super::context::{Audience, Genre, MarketContext, Mood, NameContext, NameType, Urgency};
use super::context::normalize_label;
use crate::error::{RankError, RankResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Request as received from the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRequest {
    pub candidate_names: Vec<String>,
    pub context: RequestContext,
    #[serde(default)]
    pub ranking_mode: Option<String>,
    #[serde(default)]
    pub quality_threshold: Option<f64>,
    #[serde(default)]
    pub threshold_mode: Option<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
    #[serde(default)]
    pub minimum_results: Option<usize>,
    #[serde(default)]
    pub diversity_target: Option<f64>,
    #[serde(default)]
    pub adaptive_learning: Option<bool>,
    #[serde(default)]
    pub user_preferences: Option<UserPreferencesInput>,
    #[serde(default)]
    pub feedback: Option<FeedbackInput>,
}

/// Context block of the request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(rename = "type")]
    pub name_type: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub market_context: Option<String>,
    #[serde(default)]
    pub urgency: Option<String>,
}

/// Optional caller preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferencesInput {
    #[serde(default)]
    pub quality_priority: Option<String>,
    #[serde(default)]
    pub preference_weight: Option<f64>,
    #[serde(default)]
    pub risk_tolerance: Option<String>,
    #[serde(default)]
    pub prefers_short_names: Option<bool>,
    #[serde(default)]
    pub emphasize_memorability: Option<bool>,
}

/// Satisfaction with the previous result for the same context, recorded with
/// the learning record of this request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackInput {
    pub user_satisfaction: f64,
}

/// Weighting profile for the final ranking score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankingMode {
    Comprehensive,
    Contextual,
    MarketFocused,
    CreativeFirst,
    Balanced,
}

impl RankingMode {
    pub fn parse(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "comprehensive" => Some(RankingMode::Comprehensive),
            "contextual" => Some(RankingMode::Contextual),
            "market-focused" | "market" => Some(RankingMode::MarketFocused),
            "creative-first" | "creative" => Some(RankingMode::CreativeFirst),
            "balanced" => Some(RankingMode::Balanced),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RankingMode::Comprehensive => "comprehensive",
            RankingMode::Contextual => "contextual",
            RankingMode::MarketFocused => "market-focused",
            RankingMode::CreativeFirst => "creative-first",
            RankingMode::Balanced => "balanced",
        }
    }
}

impl fmt::Display for RankingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the gate's base threshold is chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "mode", content = "value")]
pub enum ThresholdMode {
    Strict,
    Moderate,
    Lenient,
    Custom(f64),
    Adaptive,
}

impl ThresholdMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThresholdMode::Strict => "strict",
            ThresholdMode::Moderate => "moderate",
            ThresholdMode::Lenient => "lenient",
            ThresholdMode::Custom(_) => "custom",
            ThresholdMode::Adaptive => "adaptive",
        }
    }
}

/// Whether the caller favours stricter or more plentiful results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPriority {
    Quality,
    #[default]
    Balanced,
    Quantity,
}

/// Appetite for unusual names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    #[default]
    Moderate,
    Adventurous,
}

/// Validated caller preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub quality_priority: QualityPriority,
    /// Strength of the quality-priority offset (0.0-1.0)
    pub preference_weight: f64,
    pub risk_tolerance: RiskTolerance,
    pub prefers_short_names: bool,
    pub emphasize_memorability: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            quality_priority: QualityPriority::Balanced,
            preference_weight: 1.0,
            risk_tolerance: RiskTolerance::Moderate,
            prefers_short_names: false,
            emphasize_memorability: false,
        }
    }
}

/// Request after boundary validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub candidates: Vec<String>,
    pub context: NameContext,
    pub ranking_mode: RankingMode,
    pub threshold_mode: ThresholdMode,
    pub max_results: Option<usize>,
    pub minimum_results: Option<usize>,
    /// 0.0 disables diversity re-ordering
    pub diversity_target: f64,
    pub adaptive_learning: bool,
    pub preferences: UserPreferences,
    pub user_satisfaction: Option<f64>,
}

impl RankingRequest {
    /// Validate and normalize the request
    ///
    /// # Errors
    /// `RankError::Configuration` describing the first invalid parameter.
    pub fn validate(&self, max_batch_size: usize) -> RankResult<ValidatedRequest> {
        if self.candidate_names.len() > max_batch_size {
            return Err(RankError::configuration(format!(
                "batch of {} candidates exceeds the limit of {}",
                self.candidate_names.len(),
                max_batch_size
            )));
        }

        let mut candidates = Vec::with_capacity(self.candidate_names.len());
        for (i, raw) in self.candidate_names.iter().enumerate() {
            let name = raw.trim();
            if name.is_empty() {
                return Err(RankError::configuration(format!(
                    "candidate name at index {} is empty",
                    i
                )));
            }
            candidates.push(name.to_string());
        }

        let context = self.context.validate()?;

        let ranking_mode = match self.ranking_mode.as_deref() {
            None => RankingMode::Comprehensive,
            Some(label) => RankingMode::parse(label).ok_or_else(|| {
                RankError::configuration(format!(
                    "invalid rankingMode '{}' (use comprehensive|contextual|market-focused|creative-first|balanced)",
                    label
                ))
            })?,
        };

        if let Some(t) = self.quality_threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(RankError::configuration(format!(
                    "qualityThreshold must be within [0, 1], got {}",
                    t
                )));
            }
        }

        let adaptive_learning = self.adaptive_learning.unwrap_or(false);
        let threshold_mode = self.resolve_threshold_mode(adaptive_learning)?;

        let diversity_target = self.diversity_target.unwrap_or(0.0);
        if !(0.0..=1.0).contains(&diversity_target) {
            return Err(RankError::configuration(format!(
                "diversityTarget must be within [0, 1], got {}",
                diversity_target
            )));
        }

        if self.max_results == Some(0) {
            return Err(RankError::configuration("maxResults must be at least 1"));
        }

        let preferences = match &self.user_preferences {
            Some(input) => input.validate()?,
            None => UserPreferences::default(),
        };

        let user_satisfaction = match &self.feedback {
            Some(f) if !(0.0..=1.0).contains(&f.user_satisfaction) => {
                return Err(RankError::configuration(format!(
                    "feedback.userSatisfaction must be within [0, 1], got {}",
                    f.user_satisfaction
                )));
            }
            Some(f) => Some(f.user_satisfaction),
            None => None,
        };

        Ok(ValidatedRequest {
            candidates,
            context,
            ranking_mode,
            threshold_mode,
            max_results: self.max_results,
            minimum_results: self.minimum_results,
            diversity_target,
            adaptive_learning,
            preferences,
            user_satisfaction,
        })
    }

    /// Explicit mode wins, then adaptive learning, then a custom threshold
    fn resolve_threshold_mode(&self, adaptive_learning: bool) -> RankResult<ThresholdMode> {
        if let Some(label) = self.threshold_mode.as_deref() {
            return match normalize_label(label).as_str() {
                "strict" => Ok(ThresholdMode::Strict),
                "moderate" => Ok(ThresholdMode::Moderate),
                "lenient" => Ok(ThresholdMode::Lenient),
                "adaptive" => Ok(ThresholdMode::Adaptive),
                "custom" => self.quality_threshold.map(ThresholdMode::Custom).ok_or_else(|| {
                    RankError::configuration("thresholdMode 'custom' requires qualityThreshold")
                }),
                _ => Err(RankError::configuration(format!(
                    "invalid thresholdMode '{}' (use strict|moderate|lenient|custom|adaptive)",
                    label
                ))),
            };
        }
        if adaptive_learning {
            return Ok(ThresholdMode::Adaptive);
        }
        Ok(self
            .quality_threshold
            .map(ThresholdMode::Custom)
            .unwrap_or(ThresholdMode::Moderate))
    }
}

impl RequestContext {
    fn validate(&self) -> RankResult<NameContext> {
        let name_type = NameType::parse(&self.name_type).ok_or_else(|| {
            RankError::configuration(format!(
                "context.type must be 'band' or 'song', got '{}'",
                self.name_type
            ))
        })?;

        let context = NameContext {
            name_type,
            genre: Genre::parse(self.genre.as_deref()),
            mood: Mood::parse(self.mood.as_deref()),
            target_audience: Audience::parse(self.target_audience.as_deref()),
            market_context: MarketContext::parse(self.market_context.as_deref()),
            urgency: Urgency::parse(self.urgency.as_deref()),
        };

        if matches!(context.genre, Genre::Other(_))
            || matches!(context.target_audience, Audience::Other(_))
            || matches!(context.market_context, MarketContext::Other(_))
            || matches!(context.urgency, Urgency::Other(_))
        {
            debug!(
                genre = %context.genre,
                audience = %context.target_audience,
                market = %context.market_context,
                urgency = %context.urgency,
                "Unrecognized context labels carry no threshold offsets"
            );
        }

        Ok(context)
    }
}

impl UserPreferencesInput {
    fn validate(&self) -> RankResult<UserPreferences> {
        let quality_priority = match self.quality_priority.as_deref().map(normalize_label) {
            None => QualityPriority::Balanced,
            Some(label) => match label.as_str() {
                "quality" | "high" => QualityPriority::Quality,
                "balanced" => QualityPriority::Balanced,
                "quantity" | "low" => QualityPriority::Quantity,
                other => {
                    return Err(RankError::configuration(format!(
                        "invalid userPreferences.qualityPriority '{}'",
                        other
                    )))
                }
            },
        };

        let risk_tolerance = match self.risk_tolerance.as_deref().map(normalize_label) {
            None => RiskTolerance::Moderate,
            Some(label) => match label.as_str() {
                "conservative" | "low" => RiskTolerance::Conservative,
                "moderate" => RiskTolerance::Moderate,
                "adventurous" | "high" => RiskTolerance::Adventurous,
                other => {
                    return Err(RankError::configuration(format!(
                        "invalid userPreferences.riskTolerance '{}'",
                        other
                    )))
                }
            },
        };

        let preference_weight = self.preference_weight.unwrap_or(1.0);
        if !(0.0..=1.0).contains(&preference_weight) {
            return Err(RankError::configuration(format!(
                "userPreferences.preferenceWeight must be within [0, 1], got {}",
                preference_weight
            )));
        }

        Ok(UserPreferences {
            quality_priority,
            preference_weight,
            risk_tolerance,
            prefers_short_names: self.prefers_short_names.unwrap_or(false),
            emphasize_memorability: self.emphasize_memorability.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> RankingRequest {
        RankingRequest {
            candidate_names: vec!["Velvet Static".to_string(), "Iron Meadow".to_string()],
            context: RequestContext {
                name_type: "band".to_string(),
                genre: Some("rock".to_string()),
                ..Default::default()
            },
            ranking_mode: Some("market-focused".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_request() {
        let v = base_request().validate(50).unwrap();
        assert_eq!(v.ranking_mode, RankingMode::MarketFocused);
        assert_eq!(v.threshold_mode, ThresholdMode::Moderate);
        assert_eq!(v.context.genre, Genre::Rock);
        assert_eq!(v.diversity_target, 0.0);
        assert!(!v.adaptive_learning);
    }

    #[test]
    fn test_invalid_ranking_mode_rejected() {
        let mut req = base_request();
        req.ranking_mode = Some("popularity".to_string());
        let err = req.validate(50).unwrap_err();
        assert!(err.to_string().contains("rankingMode"));
    }

    #[test]
    fn test_diversity_out_of_range_rejected() {
        let mut req = base_request();
        req.diversity_target = Some(1.5);
        assert!(matches!(req.validate(50), Err(RankError::Configuration(_))));
    }

    #[test]
    fn test_batch_limit_enforced() {
        let req = base_request();
        assert!(req.validate(1).is_err());
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut req = base_request();
        req.candidate_names.push("   ".to_string());
        assert!(req.validate(50).is_err());
    }

    #[test]
    fn test_threshold_mode_resolution_order() {
        let mut req = base_request();
        req.quality_threshold = Some(0.7);
        assert_eq!(req.validate(50).unwrap().threshold_mode, ThresholdMode::Custom(0.7));

        req.adaptive_learning = Some(true);
        assert_eq!(req.validate(50).unwrap().threshold_mode, ThresholdMode::Adaptive);

        req.threshold_mode = Some("strict".to_string());
        assert_eq!(req.validate(50).unwrap().threshold_mode, ThresholdMode::Strict);
    }

    #[test]
    fn test_custom_mode_requires_threshold() {
        let mut req = base_request();
        req.threshold_mode = Some("custom".to_string());
        assert!(req.validate(50).is_err());
    }

    #[test]
    fn test_invalid_name_type_rejected() {
        let mut req = base_request();
        req.context.name_type = "album".to_string();
        assert!(req.validate(50).is_err());
    }

    #[test]
    fn test_request_json_shape() {
        let json = r#"{
            "candidateNames": ["Neon Harbor"],
            "context": {"type": "song", "mood": "dark", "targetAudience": "niche"},
            "rankingMode": "creative-first",
            "diversityTarget": 0.4,
            "adaptiveLearning": true,
            "userPreferences": {"riskTolerance": "conservative"}
        }"#;
        let req: RankingRequest = serde_json::from_str(json).unwrap();
        let v = req.validate(50).unwrap();
        assert_eq!(v.context.name_type, NameType::Song);
        assert_eq!(v.context.target_audience, Audience::Niche);
        assert_eq!(v.ranking_mode, RankingMode::CreativeFirst);
        assert_eq!(v.threshold_mode, ThresholdMode::Adaptive);
        assert_eq!(v.preferences.risk_tolerance, RiskTolerance::Conservative);
    }
}
