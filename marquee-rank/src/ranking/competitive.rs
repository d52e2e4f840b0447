//! Pairwise competitive analysis
//!
//! Every qualified candidate is compared with every other one. The batch is
//! small (tens of names) so the O(n²) pass is kept explicit.

use crate::models::ranked::{DifferentiationStrength, Direction};
use crate::models::{CompetitivePosition, DifferentiationFactor, ScoreField, ScoredCandidate};
use std::cmp::Ordering;

/// Fields compared against the peer average
pub const TRACKED_FIELDS: [ScoreField; 7] = [
    ScoreField::PhoneticFlow,
    ScoreField::SemanticCoherence,
    ScoreField::Creativity,
    ScoreField::Memorability,
    ScoreField::MarketAppeal,
    ScoreField::Uniqueness,
    ScoreField::CulturalAppeal,
];

/// Longest outperforms/underperforms list
pub const MAX_PEER_LIST: usize = 5;

const STRONG_GAP: f64 = 0.25;
const MODERATE_GAP: f64 = 0.15;
const WEAK_GAP: f64 = 0.10;

/// Competitive position of every candidate, in input order
pub fn competitive_positions(candidates: &[ScoredCandidate]) -> Vec<CompetitivePosition> {
    (0..candidates.len())
        .map(|i| position_of(i, candidates))
        .collect()
}

fn position_of(i: usize, candidates: &[ScoredCandidate]) -> CompetitivePosition {
    let me = &candidates[i];
    let peers = candidates.len().saturating_sub(1);

    let below = candidates
        .iter()
        .enumerate()
        .filter(|(j, c)| *j != i && c.overall_score < me.overall_score)
        .count();
    let percentile = if peers == 0 {
        1.0
    } else {
        below as f64 / peers as f64
    };

    CompetitivePosition {
        percentile,
        outperforms: closest(i, candidates, Ordering::Less),
        underperforms: closest(i, candidates, Ordering::Greater),
        differentiation_factors: differentiation(i, candidates),
    }
}

/// Names of peers scoring strictly lower (`Less`) or higher (`Greater`),
/// closest in score first, input order on ties
fn closest(i: usize, candidates: &[ScoredCandidate], side: Ordering) -> Vec<String> {
    let me = candidates[i].overall_score;
    let mut peers: Vec<(f64, usize)> = candidates
        .iter()
        .enumerate()
        .filter(|(j, c)| *j != i && c.overall_score.total_cmp(&me) == side)
        .map(|(j, c)| ((c.overall_score - me).abs(), j))
        .collect();
    peers.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    peers
        .into_iter()
        .take(MAX_PEER_LIST)
        .map(|(_, j)| candidates[j].name.clone())
        .collect()
}

pub fn strength_for(gap: f64) -> Option<DifferentiationStrength> {
    let g = gap.abs();
    if g > STRONG_GAP {
        Some(DifferentiationStrength::Strong)
    } else if g > MODERATE_GAP {
        Some(DifferentiationStrength::Moderate)
    } else if g > WEAK_GAP {
        Some(DifferentiationStrength::Weak)
    } else {
        None
    }
}

/// Tracked fields where the candidate differs from the peer average
fn differentiation(i: usize, candidates: &[ScoredCandidate]) -> Vec<DifferentiationFactor> {
    let peers = candidates.len().saturating_sub(1);
    if peers == 0 {
        return Vec::new();
    }

    TRACKED_FIELDS
        .iter()
        .filter_map(|&field| {
            let peer_sum: f64 = candidates
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, c)| c.breakdown.get(field))
                .sum();
            let gap = candidates[i].breakdown.get(field) - peer_sum / peers as f64;
            strength_for(gap).map(|strength| DifferentiationFactor {
                field,
                strength,
                direction: if gap > 0.0 {
                    Direction::Advantage
                } else {
                    Direction::Disadvantage
                },
                gap,
            })
        })
        .collect()
}
