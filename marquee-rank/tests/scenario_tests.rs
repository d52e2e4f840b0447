//! End-to-end acceptance scenarios
//!
//! - A: identical candidates with a diversity target and a result cap
//! - B: strict gate that must fall back to meet a minimum result count
//! - C: boundary-inclusive dimensional minimums
//! - D: analyzer failure for one candidate in a healthy batch

mod helpers;

use helpers::{band_request, pipeline_with, FixedAnalyzer, SlowAnalyzer};
use marquee_rank::gate::threshold::dimensional_minimums;
use marquee_rank::models::{FallbackStep, NameContext, NameType, ScoreBreakdown, ScoreField, ThresholdMode};
use marquee_rank::types::NameAnalyzer;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn scenario_a_identical_candidates_with_cap() {
    let names = ["Aurora One", "Aurora Two", "Aurora Three", "Aurora Four", "Aurora Five"];
    let analyzer = names
        .iter()
        .fold(FixedAnalyzer::new(), |a, n| a.uniform(n, 0.9));
    let pipeline = pipeline_with(vec![Arc::new(analyzer)]);

    let mut request = band_request(&names);
    request.diversity_target = Some(0.8);
    request.max_results = Some(3);

    let response = pipeline.rank(&request).await.unwrap();
    assert_eq!(response.ranked_names.len(), 3);
    assert_eq!(response.capped_names.len(), 2);
    assert!(response.rejected_names.is_empty());
    let ranks: Vec<usize> = response.ranked_names.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[tokio::test]
async fn scenario_b_strict_gate_falls_back() {
    let scores = [0.95, 0.89, 0.83, 0.77, 0.71, 0.65, 0.59, 0.53, 0.47, 0.41];
    let names: Vec<String> = (0..scores.len()).map(|i| format!("Candidate {}", i)).collect();
    let analyzer = names
        .iter()
        .zip(scores)
        .fold(FixedAnalyzer::new(), |a, (n, s)| a.uniform(n, s));
    let pipeline = pipeline_with(vec![Arc::new(analyzer)]);

    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut request = band_request(&name_refs);
    request.threshold_mode = Some("strict".into());
    request.minimum_results = Some(5);

    let response = pipeline.rank(&request).await.unwrap();
    let gate = &response.analytics.gate;

    assert!(gate.fallback.triggered);
    assert!(gate
        .fallback
        .steps
        .iter()
        .any(|s| matches!(s, FallbackStep::LowerThreshold { .. })));
    assert!(response.threshold_used <= gate.initial_threshold);
    assert!(response.threshold_used >= 0.30);
    assert!((response.threshold_used - 0.70).abs() < 1e-9);
    assert_eq!(response.ranked_names.len(), 5);
    assert_eq!(response.rejected_names.len(), 5);
}

#[tokio::test]
async fn scenario_c_values_on_minimums_qualify() {
    let ctx = NameContext::new(NameType::Band);
    let minimums = dimensional_minimums(ThresholdMode::Moderate, &ctx);

    let mut breakdown = ScoreBreakdown::uniform(0.30);
    breakdown.set(ScoreField::CulturalAppeal, 0.25);
    for (field, minimum) in &minimums {
        breakdown.set(*field, *minimum);
    }

    let analyzer = FixedAnalyzer::new().breakdown("Edge Of Town", breakdown);
    let pipeline = pipeline_with(vec![Arc::new(analyzer)]);

    let mut request = band_request(&["Edge Of Town"]);
    request.threshold_mode = Some("custom".into());
    request.quality_threshold = Some(0.20);

    let response = pipeline.rank(&request).await.unwrap();
    assert!(response.rejected_names.is_empty(), "{:?}", response.rejected_names);
    assert_eq!(response.ranked_names.len(), 1);
    assert!(!response.analytics.gate.fallback.triggered);
}

#[tokio::test]
async fn scenario_d_analyzer_failure_lowers_confidence() {
    let analyzer = FixedAnalyzer::new()
        .uniform("Healthy One", 0.8)
        .uniform("Healthy Two", 0.75)
        .uniform("Broken Wing", 0.9)
        .failing("Broken Wing");
    let pipeline = pipeline_with(vec![Arc::new(analyzer)]);

    let mut request = band_request(&["Healthy One", "Broken Wing", "Healthy Two"]);
    request.threshold_mode = Some("lenient".into());

    let response = pipeline.rank(&request).await.unwrap();
    let accounted = response.ranked_names.len() + response.rejected_names.len();
    assert_eq!(accounted, 3);

    let confidence_of = |name: &str| {
        response
            .ranked_names
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.confidence_score)
    };
    let broken = confidence_of("Broken Wing").expect("neutral scores pass the lenient gate");
    let healthy = confidence_of("Healthy One").unwrap();
    assert!(broken < healthy);
    assert!(response.analytics.mean_confidence < 1.0);
}

#[tokio::test]
async fn analyzer_timeout_is_isolated() {
    let fixed = FixedAnalyzer::new().uniform("Slow Burn", 0.8);
    let analyzers: Vec<Arc<dyn NameAnalyzer>> = vec![
        Arc::new(fixed),
        Arc::new(SlowAnalyzer {
            delay: Duration::from_secs(5),
        }),
    ];
    let pipeline = pipeline_with(analyzers);

    let response = pipeline.rank(&band_request(&["Slow Burn"])).await.unwrap();
    assert_eq!(response.ranked_names.len(), 1);
    // The slow analyzer's creativity report never arrived
    assert!((response.ranked_names[0].overall_score - 0.8).abs() < 1e-9);
}
