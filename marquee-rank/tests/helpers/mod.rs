//! Test helper modules for marquee-rank integration tests
//!
//! - `analyzers`: scripted analyzers with fixed, failing or slow behavior
//! - request and pipeline builders shared by every suite

#![allow(dead_code)]

pub mod analyzers;

pub use analyzers::{FixedAnalyzer, SlowAnalyzer};

use marquee_rank::gate::QualityThresholdManager;
use marquee_rank::learning::{AdaptiveSettings, LearningStore};
use marquee_rank::models::request::RequestContext;
use marquee_rank::models::{ExclusionCriteria, FallbackSettings};
use marquee_rank::types::NameAnalyzer;
use marquee_rank::{Pipeline, PipelineConfig, RankingRequest};
use std::sync::Arc;
use std::time::Duration;

/// Band request with the given names and every option left to defaults
pub fn band_request(names: &[&str]) -> RankingRequest {
    RankingRequest {
        candidate_names: names.iter().map(|s| s.to_string()).collect(),
        context: RequestContext {
            name_type: "band".into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn gate() -> QualityThresholdManager {
    QualityThresholdManager::new(
        FallbackSettings::default(),
        ExclusionCriteria::default(),
        AdaptiveSettings::default(),
    )
}

pub fn pipeline_config() -> PipelineConfig {
    PipelineConfig {
        analysis_timeout: Duration::from_millis(500),
        max_concurrency: 4,
        max_batch_size: 50,
    }
}

/// Pipeline over the given analyzers with default gate settings
pub fn pipeline_with(analyzers: Vec<Arc<dyn NameAnalyzer>>) -> Pipeline {
    Pipeline::new(pipeline_config(), analyzers, gate())
}

/// Pipeline whose gate records into and learns from `store`
pub fn learning_pipeline(analyzers: Vec<Arc<dyn NameAnalyzer>>, store: Arc<dyn LearningStore>) -> Pipeline {
    Pipeline::new(pipeline_config(), analyzers, gate().with_learning_store(store))
}
