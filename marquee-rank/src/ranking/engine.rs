//! Comparative ranking engine
//!
//! Takes the qualified candidates of one batch and produces the final
//! ordered list:
//!
//! 1. Competitive analysis against every other qualified candidate
//! 2. Mode-weighted final score plus preference adjustments
//! 3. Stable descending sort by final score
//! 4. Optional diversity re-ordering
//! 5. `maxResults` cap, dense ranks, explanations
//!
//! Positioning is a summary; if it cannot be computed it is replaced by an
//! empty summary and the ranking itself is kept.

use super::competitive::competitive_positions;
use super::diversity::diversify;
use super::positioning::{market_position, positioning};
use super::weights::final_score;
use crate::models::ranked::ImprovementOpportunity;
use crate::models::{
    CompetitivePosition, PositioningSummary, RankedName, RankingMode, ScoreField, ScoredCandidate,
    UserPreferences,
};
use tracing::{debug, warn};

/// Field value at or above which it counts as a strength
pub const STRENGTH_THRESHOLD: f64 = 0.7;
/// Field value below which it is an improvement opportunity
pub const IMPROVEMENT_THRESHOLD: f64 = 0.5;
/// Most strengths or opportunities listed per name
pub const MAX_LISTED: usize = 3;

/// Ranking parameters for one request
#[derive(Debug, Clone, Copy)]
pub struct RankingOptions<'a> {
    pub mode: RankingMode,
    pub preferences: &'a UserPreferences,
    /// 0.0 disables diversity re-ordering
    pub diversity_target: f64,
    pub max_results: Option<usize>,
}

/// Output of the ranking stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingOutput {
    pub ranked: Vec<RankedName>,
    /// Qualified names left out only by the result cap
    pub capped: Vec<String>,
    pub positioning: PositioningSummary,
}

#[derive(Debug, Clone, Default)]
pub struct RankingEngine;

impl RankingEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn rank(&self, qualified: &[ScoredCandidate], options: &RankingOptions<'_>) -> RankingOutput {
        if qualified.is_empty() {
            return RankingOutput {
                positioning: positioning(&[]).unwrap_or_default(),
                ..Default::default()
            };
        }

        let positions = competitive_positions(qualified);
        let scores: Vec<f64> = qualified
            .iter()
            .zip(&positions)
            .map(|(c, p)| final_score(c, p.percentile, options.mode, options.preferences))
            .collect();

        let mut order: Vec<usize> = (0..qualified.len()).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        let vectors: Vec<[f64; 5]> = qualified.iter().map(|c| c.quality_vector.dimensions()).collect();
        let order = diversify(&order, &scores, &vectors, options.diversity_target);

        let keep = options.max_results.unwrap_or(order.len()).min(order.len());
        let (kept, dropped) = order.split_at(keep);
        let capped: Vec<String> = dropped.iter().map(|&i| qualified[i].name.clone()).collect();
        if !capped.is_empty() {
            debug!(kept = keep, capped = capped.len(), "Applied result cap");
        }

        let ranked: Vec<RankedName> = kept
            .iter()
            .enumerate()
            .map(|(pos, &i)| ranked_name(&qualified[i], pos + 1, keep, scores[i], positions[i].clone()))
            .collect();

        let in_rank_order: Vec<&ScoredCandidate> = kept.iter().map(|&i| &qualified[i]).collect();
        let positioning = positioning(&in_rank_order).unwrap_or_else(|e| {
            warn!(error = %e, "Positioning summary failed; using empty summary");
            PositioningSummary::default()
        });

        RankingOutput {
            ranked,
            capped,
            positioning,
        }
    }
}

fn ranked_name(
    c: &ScoredCandidate,
    rank: usize,
    of: usize,
    final_score: f64,
    competitive_position: CompetitivePosition,
) -> RankedName {
    let strength_areas = strengths(c);
    let improvement_opportunities = improvements(c);
    let market_position = market_position(c);
    let explanation = explain(c, rank, of, final_score, &strength_areas, &improvement_opportunities);

    RankedName {
        name: c.name.clone(),
        rank,
        overall_score: c.overall_score,
        final_score,
        competitive_position,
        market_position,
        strength_areas,
        improvement_opportunities,
        confidence_score: 0.7 * c.confidence + 0.3 * c.quality_vector.balance,
        explanation,
    }
}

/// Highest fields at or above the strength threshold, best first
fn strengths(c: &ScoredCandidate) -> Vec<ScoreField> {
    let mut fields: Vec<(ScoreField, f64)> = ScoreField::ALL
        .iter()
        .map(|&f| (f, c.breakdown.get(f)))
        .filter(|&(_, v)| v >= STRENGTH_THRESHOLD)
        .collect();
    fields.sort_by(|a, b| b.1.total_cmp(&a.1));
    fields.into_iter().take(MAX_LISTED).map(|(f, _)| f).collect()
}

/// Lowest fields below the improvement threshold, worst first
fn improvements(c: &ScoredCandidate) -> Vec<ImprovementOpportunity> {
    let mut fields: Vec<(ScoreField, f64)> = ScoreField::ALL
        .iter()
        .map(|&f| (f, c.breakdown.get(f)))
        .filter(|&(_, v)| v < IMPROVEMENT_THRESHOLD)
        .collect();
    fields.sort_by(|a, b| a.1.total_cmp(&b.1));
    fields
        .into_iter()
        .take(MAX_LISTED)
        .map(|(field, current)| ImprovementOpportunity {
            field,
            current,
            suggestion: suggestion(field).to_string(),
        })
        .collect()
}

fn suggestion(field: ScoreField) -> &'static str {
    match field {
        ScoreField::PhoneticFlow => "Smooth consonant clusters so the name rolls off the tongue",
        ScoreField::SemanticCoherence => "Pick words that share a theme or image",
        ScoreField::Creativity => "Try an unexpected word pairing",
        ScoreField::Memorability => "Shorten it or add a rhythmic hook",
        ScoreField::MarketAppeal => "Use more familiar vocabulary",
        ScoreField::Appropriateness => "Soften language that narrows the audience",
        ScoreField::Uniqueness => "Replace common words with less used ones",
        ScoreField::Pronunciation => "Simplify spelling and syllable structure",
        ScoreField::CulturalAppeal => "Favour imagery that travels across audiences",
        ScoreField::GenreOptimization => "Borrow vocabulary associated with the genre",
        ScoreField::PhoneticSemanticAlignment => "Match the sound of the words to the intended mood",
    }
}

fn explain(
    c: &ScoredCandidate,
    rank: usize,
    of: usize,
    final_score: f64,
    strengths: &[ScoreField],
    improvements: &[ImprovementOpportunity],
) -> String {
    let mut text = format!(
        "Ranked {} of {} with final score {:.2} (overall {:.2})",
        rank, of, final_score, c.overall_score
    );
    if !strengths.is_empty() {
        let names: Vec<&str> = strengths.iter().map(|f| f.display_name()).collect();
        text.push_str(&format!("; strongest in {}", names.join(", ")));
    }
    if let Some(weakest) = improvements.first() {
        text.push_str(&format!("; weakest in {}", weakest.field.display_name()));
    }
    text
}
