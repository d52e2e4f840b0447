//! Market positioning
//!
//! Projects candidates onto the creativity x market-appeal plane, groups them
//! into fixed-radius clusters and reports empty cells of a 3x3 grid as
//! opportunity gaps.

use crate::error::SummaryError;
use crate::math::mean;
use crate::models::ranked::{MarketSegment, RiskLevel};
use crate::models::{ClusterSummary, MarketPosition, OpportunityGap, PositioningSummary, ScoredCandidate};

pub const CLUSTER_RADIUS: f64 = 0.15;
pub const GRID_CELLS: usize = 3;
/// Creativity or market appeal at or above this counts as high
const HIGH: f64 = 0.6;

pub fn segment_for(creativity: f64, market_appeal: f64) -> MarketSegment {
    match (creativity >= HIGH, market_appeal >= HIGH) {
        (true, true) => MarketSegment::Breakout,
        (true, false) => MarketSegment::AvantGarde,
        (false, true) => MarketSegment::Mainstream,
        (false, false) => MarketSegment::Emerging,
    }
}

fn segment_label(segment: MarketSegment) -> &'static str {
    match segment {
        MarketSegment::Breakout => "breakout",
        MarketSegment::AvantGarde => "avant-garde",
        MarketSegment::Mainstream => "mainstream",
        MarketSegment::Emerging => "emerging",
    }
}

pub fn market_position(c: &ScoredCandidate) -> MarketPosition {
    let b = &c.breakdown;
    let risk_score = 0.5 * b.uniqueness + 0.5 * (1.0 - b.appropriateness);
    let risk = if risk_score > 0.6 {
        RiskLevel::High
    } else if risk_score > 0.35 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    MarketPosition {
        segment: segment_for(b.creativity, b.market_appeal),
        appeal: 0.6 * b.market_appeal + 0.4 * b.memorability,
        viability: mean(&[c.overall_score, b.pronunciation, b.appropriateness]),
        risk,
    }
}

fn point(c: &ScoredCandidate) -> (f64, f64) {
    (c.breakdown.creativity, c.breakdown.market_appeal)
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

fn cell_of(value: f64) -> usize {
    ((value * GRID_CELLS as f64).floor() as usize).min(GRID_CELLS - 1)
}

fn level(cell: usize) -> &'static str {
    match cell {
        0 => "low",
        1 => "mid",
        _ => "high",
    }
}

/// Cluster and gap summary of candidates given in rank order
///
/// # Errors
/// `SummaryError::NonFinite` if any projected coordinate is not finite.
pub fn positioning(ranked: &[&ScoredCandidate]) -> Result<PositioningSummary, SummaryError> {
    let points: Vec<(f64, f64)> = ranked.iter().map(|c| point(c)).collect();
    if points.iter().any(|p| !p.0.is_finite() || !p.1.is_finite()) {
        return Err(SummaryError::NonFinite("positioning projection"));
    }

    // Single pass: join the nearest seed within the radius, else seed a new cluster
    let mut seeds: Vec<(f64, f64)> = Vec::new();
    let mut members: Vec<Vec<usize>> = Vec::new();
    for (i, &p) in points.iter().enumerate() {
        let nearest = seeds
            .iter()
            .enumerate()
            .map(|(k, &s)| (k, distance(p, s)))
            .filter(|&(_, d)| d <= CLUSTER_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        match nearest {
            Some((k, _)) => members[k].push(i),
            None => {
                seeds.push(p);
                members.push(vec![i]);
            }
        }
    }

    let clusters = members
        .iter()
        .enumerate()
        .map(|(id, idx)| {
            let xs: Vec<f64> = idx.iter().map(|&i| points[i].0).collect();
            let ys: Vec<f64> = idx.iter().map(|&i| points[i].1).collect();
            let centroid = (mean(&xs), mean(&ys));
            ClusterSummary {
                id,
                centroid,
                members: idx.iter().map(|&i| ranked[i].name.clone()).collect(),
                label: segment_label(segment_for(centroid.0, centroid.1)).to_string(),
            }
        })
        .collect();

    let mut occupied = [[false; GRID_CELLS]; GRID_CELLS];
    for &(x, y) in &points {
        occupied[cell_of(x)][cell_of(y)] = true;
    }
    let width = 1.0 / GRID_CELLS as f64;
    let mut opportunity_gaps = Vec::new();
    for (cx, column) in occupied.iter().enumerate() {
        for (cy, &taken) in column.iter().enumerate() {
            if taken {
                continue;
            }
            opportunity_gaps.push(OpportunityGap {
                creativity_range: (cx as f64 * width, (cx + 1) as f64 * width),
                market_appeal_range: (cy as f64 * width, (cy + 1) as f64 * width),
                description: format!(
                    "No candidates with {} creativity and {} market appeal",
                    level(cx),
                    level(cy)
                ),
            });
        }
    }

    Ok(PositioningSummary {
        clusters,
        opportunity_gaps,
    })
}
