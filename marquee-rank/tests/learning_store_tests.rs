//! SQLite learning store on disk, alone and behind an adaptive pipeline

mod helpers;

use chrono::{DateTime, Duration, Utc};
use helpers::{band_request, learning_pipeline, FixedAnalyzer};
use marquee_rank::learning::{LearningOutcome, LearningRecord, LearningStore, SqliteLearningStore};
use marquee_rank::models::{NameContext, NameType};
use std::sync::Arc;
use tempfile::TempDir;

fn record(key: &str, threshold_used: f64, recorded_at: DateTime<Utc>) -> LearningRecord {
    LearningRecord {
        context_key: key.to_string(),
        threshold_used,
        outcome: LearningOutcome {
            total: 8,
            qualified: 4,
            mean_qualified_score: 0.72,
            user_satisfaction: None,
        },
        recorded_at,
    }
}

#[tokio::test]
async fn test_history_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("learning").join("history.db");
    let now = Utc::now();

    {
        let store = SqliteLearningStore::open(&path).await.unwrap();
        store.append(record("band|rock", 0.62, now)).await.unwrap();
        let mut with_feedback = record("band|rock", 0.58, now + Duration::seconds(1));
        with_feedback.outcome.user_satisfaction = Some(0.9);
        store.append(with_feedback).await.unwrap();
    }
    assert!(path.exists());

    let store = SqliteLearningStore::open(&path).await.unwrap();
    let history = store
        .recent("band|rock", now - Duration::hours(1), 10)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    // Newest first
    assert_eq!(history[0].threshold_used, 0.58);
    assert_eq!(history[0].outcome.user_satisfaction, Some(0.9));
    assert_eq!(history[1].outcome.user_satisfaction, None);

    let other = store
        .recent("song|rock", now - Duration::hours(1), 10)
        .await
        .unwrap();
    assert!(other.is_empty());
}

#[tokio::test]
async fn test_prune_drops_only_old_records() {
    let dir = TempDir::new().unwrap();
    let store = SqliteLearningStore::open(&dir.path().join("history.db")).await.unwrap();
    let now = Utc::now();

    store.append(record("k", 0.5, now - Duration::hours(400))).await.unwrap();
    store.append(record("k", 0.6, now - Duration::hours(200))).await.unwrap();
    store.append(record("k", 0.7, now)).await.unwrap();

    let removed = store.prune(now - Duration::hours(168)).await.unwrap();
    assert_eq!(removed, 2);

    let left = store.recent("k", now - Duration::hours(1000), 10).await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].threshold_used, 0.7);
}

#[tokio::test]
async fn test_concurrent_appends_are_all_stored() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SqliteLearningStore::open(&dir.path().join("history.db")).await.unwrap());
    let now = Utc::now();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .append(record("shared", 0.5 + i as f64 * 0.01, now + Duration::milliseconds(i)))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let history = store.recent("shared", now - Duration::hours(1), 100).await.unwrap();
    assert_eq!(history.len(), 8);
}

#[tokio::test]
async fn test_adaptive_requests_learn_from_previous_runs() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn LearningStore> =
        Arc::new(SqliteLearningStore::open(&dir.path().join("history.db")).await.unwrap());

    let names = ["Glass Arcade", "Honey Static", "Low Orbit", "Night Ferry"];
    let analyzer = FixedAnalyzer::new()
        .uniform("Glass Arcade", 0.85)
        .uniform("Honey Static", 0.7)
        .uniform("Low Orbit", 0.6)
        .uniform("Night Ferry", 0.5);
    let pipeline = learning_pipeline(vec![Arc::new(analyzer)], Arc::clone(&store));

    let mut request = band_request(&names);
    request.threshold_mode = Some("adaptive".into());

    let first = pipeline.rank(&request).await.unwrap();
    assert!((first.analytics.gate.initial_threshold - 0.65).abs() < 1e-9);

    let second = pipeline.rank(&request).await.unwrap();
    let expected = 0.7 * 0.65 + 0.3 * first.threshold_used;
    assert!(
        (second.analytics.gate.initial_threshold - expected).abs() < 1e-6,
        "expected {}, got {}",
        expected,
        second.analytics.gate.initial_threshold
    );

    let key = NameContext::new(NameType::Band).learning_key();
    let history = store
        .recent(&key, Utc::now() - Duration::hours(1), 10)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].threshold_used, first.threshold_used);
}
