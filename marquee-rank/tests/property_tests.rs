//! Invariants that must hold for any batch
//!
//! Determinism, threshold bounds, rank contiguity, rejection completeness
//! and diversity ordering.

mod helpers;

use helpers::{band_request, pipeline_with, FixedAnalyzer};
use marquee_rank::analyzers::{default_analyzers, StaticLexicon};
use marquee_rank::gate::{compute_threshold, ThresholdInputs};
use marquee_rank::models::gate::{THRESHOLD_MAX, THRESHOLD_MIN};
use marquee_rank::models::{
    Audience, ExclusionCriteria, FallbackSettings, Genre, MarketContext, NameContext, NameType,
    QualityPriority, ScoreBreakdown, ScoreField, ThresholdMode, Urgency, UserPreferences,
};
use std::collections::HashSet;
use std::sync::Arc;

const MIXED_NAMES: [&str; 8] = [
    "Midnight Echo",
    "Velvet Thunder",
    "Qxzvbt",
    "Stone Harbor",
    "The Blue",
    "Crimson Lantern Society",
    "Zz",
    "Paper Satellites",
];

fn lexicon_pipeline() -> marquee_rank::Pipeline {
    pipeline_with(default_analyzers(Arc::new(StaticLexicon::new())))
}

#[tokio::test]
async fn test_same_request_gives_same_response() {
    let mut request = band_request(&MIXED_NAMES);
    request.context.genre = Some("indie".into());
    request.diversity_target = Some(0.3);

    let first = lexicon_pipeline().rank(&request).await.unwrap();
    let mut second = lexicon_pipeline().rank(&request).await.unwrap();

    assert_ne!(first.request_id, second.request_id);
    second.request_id = first.request_id;
    assert_eq!(first, second);
}

#[test]
fn test_threshold_stays_within_bounds() {
    let modes = [
        ThresholdMode::Strict,
        ThresholdMode::Moderate,
        ThresholdMode::Lenient,
        ThresholdMode::Custom(0.0),
        ThresholdMode::Custom(1.0),
        ThresholdMode::Adaptive,
    ];
    let contexts = [
        NameContext::new(NameType::Band),
        NameContext {
            genre: Genre::Pop,
            target_audience: Audience::Mainstream,
            market_context: MarketContext::Commercial,
            urgency: Urgency::Low,
            ..NameContext::new(NameType::Song)
        },
        NameContext {
            genre: Genre::Experimental,
            target_audience: Audience::Underground,
            market_context: MarketContext::Experimental,
            urgency: Urgency::Immediate,
            ..NameContext::new(NameType::Band)
        },
    ];
    let preferences = [
        UserPreferences::default(),
        UserPreferences {
            quality_priority: QualityPriority::Quality,
            ..Default::default()
        },
        UserPreferences {
            quality_priority: QualityPriority::Quantity,
            ..Default::default()
        },
    ];

    for mode in modes {
        for ctx in &contexts {
            for prefs in &preferences {
                for learned in [None, Some(0.0), Some(1.0)] {
                    let inputs = ThresholdInputs {
                        mode,
                        context: ctx,
                        preferences: prefs,
                        learned,
                        stability_factor: 0.7,
                        exclusions: ExclusionCriteria::default(),
                        fallback: FallbackSettings::default(),
                    };
                    let config = compute_threshold(&inputs).unwrap();
                    assert!(
                        (THRESHOLD_MIN..=THRESHOLD_MAX).contains(&config.threshold),
                        "{:?} {:?} {:?} -> {}",
                        mode,
                        ctx,
                        learned,
                        config.threshold
                    );
                }
            }
        }
    }
}

#[tokio::test]
async fn test_ranks_are_contiguous_from_one() {
    for max_results in [None, Some(1), Some(3)] {
        let mut request = band_request(&MIXED_NAMES);
        request.threshold_mode = Some("lenient".into());
        request.max_results = max_results;

        let response = lexicon_pipeline().rank(&request).await.unwrap();
        let ranks: Vec<usize> = response.ranked_names.iter().map(|r| r.rank).collect();
        let expected: Vec<usize> = (1..=ranks.len()).collect();
        assert_eq!(ranks, expected);
        if let Some(cap) = max_results {
            assert!(response.ranked_names.len() <= cap);
        }
    }
}

#[tokio::test]
async fn test_every_candidate_lands_in_exactly_one_list() {
    let mut request = band_request(&MIXED_NAMES);
    request.threshold_mode = Some("strict".into());
    request.max_results = Some(2);

    let response = lexicon_pipeline().rank(&request).await.unwrap();

    let mut seen = HashSet::new();
    let all = response
        .ranked_names
        .iter()
        .map(|r| r.name.as_str())
        .chain(response.rejected_names.iter().map(|r| r.name.as_str()))
        .chain(response.capped_names.iter().map(String::as_str));
    for name in all {
        assert!(seen.insert(name), "{} appears twice", name);
    }
    let expected: HashSet<&str> = MIXED_NAMES.iter().copied().collect();
    assert_eq!(seen, expected);

    for rejected in &response.rejected_names {
        assert!(!rejected.reasons.is_empty(), "{} has no reason", rejected.name);
    }
}

#[tokio::test]
async fn test_zero_diversity_keeps_score_order() {
    let analyzer = FixedAnalyzer::new()
        .uniform("Low Tide", 0.70)
        .uniform("High Noon", 0.92)
        .uniform("Mid Summer", 0.81)
        .uniform("Dawn Chorus", 0.88);
    let pipeline = pipeline_with(vec![Arc::new(analyzer)]);

    let mut request = band_request(&["Low Tide", "High Noon", "Mid Summer", "Dawn Chorus"]);
    request.diversity_target = Some(0.0);

    let response = pipeline.rank(&request).await.unwrap();
    let scores: Vec<f64> = response.ranked_names.iter().map(|r| r.final_score).collect();
    assert_eq!(scores.len(), 4);
    assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{:?}", scores);
    assert_eq!(response.ranked_names[0].name, "High Noon");
}

#[tokio::test]
async fn test_full_diversity_separates_near_duplicates() {
    let creative = |market: f64| {
        let mut b = ScoreBreakdown::uniform(0.6);
        b.set(ScoreField::Creativity, 0.95);
        b.set(ScoreField::Uniqueness, 0.95);
        b.set(ScoreField::Memorability, 0.9);
        b.set(ScoreField::MarketAppeal, market);
        b.set(ScoreField::CulturalAppeal, 0.9);
        b
    };
    let mut sound = ScoreBreakdown::uniform(0.6);
    for field in [
        ScoreField::PhoneticFlow,
        ScoreField::Pronunciation,
        ScoreField::SemanticCoherence,
        ScoreField::PhoneticSemanticAlignment,
    ] {
        sound.set(field, 0.9);
    }

    let analyzer = FixedAnalyzer::new()
        .breakdown("A1", creative(0.9))
        .breakdown("A2", creative(0.89))
        .breakdown("B1", sound);
    let pipeline = pipeline_with(vec![Arc::new(analyzer)]);

    let mut request = band_request(&["A1", "A2", "B1"]);
    request.diversity_target = Some(1.0);

    let response = pipeline.rank(&request).await.unwrap();
    let order: Vec<&str> = response.ranked_names.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(order, vec!["A1", "B1", "A2"]);
}

#[tokio::test]
async fn test_names_too_short_are_excluded() {
    let analyzer = FixedAnalyzer::new().uniform("Q", 0.9).uniform("Quiet Riot", 0.9);
    let pipeline = pipeline_with(vec![Arc::new(analyzer)]);

    let response = pipeline.rank(&band_request(&["Q", "Quiet Riot"])).await.unwrap();
    assert_eq!(response.ranked_names.len(), 1);
    assert_eq!(response.rejected_names.len(), 1);
    assert_eq!(response.rejected_names[0].name, "Q");
}
