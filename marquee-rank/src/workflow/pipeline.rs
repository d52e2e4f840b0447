//! Pipeline Orchestrator
//!
//! Wires analyzers, aggregator, quality gate and ranking engine together for
//! a single request.
//!
//! # Error Handling
//! - Only request validation can fail `rank`; it returns
//!   `RankError::Configuration`
//! - Analyzer failures and timeouts become empty partials (lower confidence)
//! - Gate failures become the emergency outcome; summary failures become
//!   default summaries
//!
//! # Example
//! ```rust,ignore
//! let pipeline = Pipeline::new(PipelineConfig::default(), analyzers, gate);
//! let response = pipeline.rank(&request).await?;
//! ```

use super::WorkflowEvent;
use crate::analytics::build_analytics;
use crate::analyzers::run_all;
use crate::error::RankResult;
use crate::fusion::{AnalysisInput, DimensionAggregator};
use crate::gate::{GateRequest, QualityThresholdManager};
use crate::models::{NameContext, RankingRequest, RankingResponse, ScoredCandidate, ThresholdMode, ValidatedRequest};
use crate::ranking::{RankingEngine, RankingOptions};
use crate::types::NameAnalyzer;
use futures::stream::{self, StreamExt};
use marquee_common::config::AnalysisSettings;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Per-analyzer call timeout
    pub analysis_timeout: Duration,
    /// Candidates analyzed concurrently
    pub max_concurrency: usize,
    /// Largest accepted batch
    pub max_batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&AnalysisSettings::default())
    }
}

impl From<&AnalysisSettings> for PipelineConfig {
    fn from(s: &AnalysisSettings) -> Self {
        Self {
            analysis_timeout: marquee_common::time::millis_to_duration(s.timeout_ms),
            max_concurrency: s.max_concurrency.unwrap_or_else(num_cpus::get).max(1),
            max_batch_size: s.max_batch_size,
        }
    }
}

pub struct Pipeline {
    config: PipelineConfig,
    analyzers: Vec<Arc<dyn NameAnalyzer>>,
    aggregator: DimensionAggregator,
    gate: QualityThresholdManager,
    engine: RankingEngine,
    event_tx: Option<mpsc::Sender<WorkflowEvent>>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        analyzers: Vec<Arc<dyn NameAnalyzer>>,
        gate: QualityThresholdManager,
    ) -> Self {
        Self {
            config,
            analyzers,
            aggregator: DimensionAggregator::new(),
            gate,
            engine: RankingEngine::new(),
            event_tx: None,
        }
    }

    /// Attach an event channel for progress reporting
    pub fn with_events(mut self, event_tx: mpsc::Sender<WorkflowEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Validate and process a ranking request
    ///
    /// # Errors
    /// `RankError::Configuration` when the request is malformed. Nothing
    /// after validation fails the request.
    pub async fn rank(&self, request: &RankingRequest) -> RankResult<RankingResponse> {
        let validated = request.validate(self.config.max_batch_size)?;
        Ok(self.rank_validated(validated).await)
    }

    /// Process an already validated request
    pub async fn rank_validated(&self, request: ValidatedRequest) -> RankingResponse {
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        info!(
            request_id = %request_id,
            candidates = request.candidates.len(),
            ranking_mode = %request.ranking_mode,
            threshold_mode = request.threshold_mode.as_str(),
            "Ranking request started"
        );
        self.emit_event(WorkflowEvent::RequestStarted {
            request_id,
            candidates: request.candidates.len(),
            timestamp: chrono::Utc::now().timestamp(),
        })
        .await;

        // Phases 2-3: analysis and aggregation
        let scored = self.score_all(&request.candidates, &request.context).await;
        for c in &scored {
            self.emit_event(WorkflowEvent::CandidateScored {
                request_id,
                name: c.name.clone(),
                overall_score: c.overall_score,
                confidence: c.confidence,
            })
            .await;
        }

        // Phase 4: quality gate
        let gate_request = GateRequest {
            mode: request.threshold_mode,
            context: &request.context,
            preferences: &request.preferences,
            minimum_results: request.minimum_results,
        };
        let outcome = self.gate.evaluate(&gate_request, &scored).await;
        if request.adaptive_learning || request.threshold_mode == ThresholdMode::Adaptive {
            self.gate
                .record_outcome(&request.context, &outcome, request.user_satisfaction)
                .await;
        }
        self.emit_event(WorkflowEvent::GateCompleted {
            request_id,
            threshold_used: outcome.threshold_used,
            qualified: outcome.qualified.len(),
            rejected: outcome.rejected.len(),
            fallback_triggered: outcome.fallback.triggered,
            emergency: outcome.emergency,
        })
        .await;

        // Phase 5: ranking
        let options = RankingOptions {
            mode: request.ranking_mode,
            preferences: &request.preferences,
            diversity_target: request.diversity_target,
            max_results: request.max_results,
        };
        let ranking = self.engine.rank(&outcome.qualified, &options);
        self.emit_event(WorkflowEvent::RankingCompleted {
            request_id,
            ranked: ranking.ranked.len(),
            capped: ranking.capped.len(),
        })
        .await;

        // Phase 6: analytics
        let analytics = build_analytics(&scored, &outcome, request.threshold_mode, ranking.positioning);

        let duration_ms = started.elapsed().as_millis() as u64;
        info!(
            request_id = %request_id,
            ranked = ranking.ranked.len(),
            rejected = outcome.rejected.len(),
            capped = ranking.capped.len(),
            threshold_used = outcome.threshold_used,
            duration_ms,
            "Ranking request complete"
        );
        self.emit_event(WorkflowEvent::RequestCompleted {
            request_id,
            duration_ms,
            timestamp: chrono::Utc::now().timestamp(),
        })
        .await;

        RankingResponse {
            request_id,
            ranked_names: ranking.ranked,
            rejected_names: outcome.rejected,
            capped_names: ranking.capped,
            threshold_used: outcome.threshold_used,
            analytics,
        }
    }

    /// Analyze every candidate (bounded concurrency, input order kept) and
    /// aggregate the batch
    async fn score_all(&self, names: &[String], ctx: &NameContext) -> Vec<ScoredCandidate> {
        let analyzers = &self.analyzers;
        let timeout = self.config.analysis_timeout;

        let inputs: Vec<AnalysisInput> = stream::iter(names.iter().cloned())
            .map(|name| async move {
                let started = Instant::now();
                let partials = run_all(analyzers, &name, ctx, timeout).await;
                let analysis_time_ms = started.elapsed().as_millis() as u64;
                debug!(name = %name, partials = partials.len(), analysis_time_ms, "Candidate analyzed");
                AnalysisInput {
                    name,
                    partials,
                    analysis_time_ms,
                }
            })
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        self.aggregator.aggregate_batch(ctx, &inputs)
    }

    async fn emit_event(&self, event: WorkflowEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::{default_analyzers, StaticLexicon};
    use crate::learning::AdaptiveSettings;
    use crate::models::request::RequestContext;
    use crate::models::{ExclusionCriteria, FallbackSettings};

    fn pipeline() -> Pipeline {
        let gate = QualityThresholdManager::new(
            FallbackSettings::default(),
            ExclusionCriteria::default(),
            AdaptiveSettings::default(),
        );
        Pipeline::new(
            PipelineConfig::default(),
            default_analyzers(Arc::new(StaticLexicon::new())),
            gate,
        )
    }

    fn request(names: &[&str]) -> RankingRequest {
        RankingRequest {
            candidate_names: names.iter().map(|s| s.to_string()).collect(),
            context: RequestContext {
                name_type: "band".into(),
                genre: Some("rock".into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert!(config.max_concurrency >= 1);
        assert_eq!(config.max_batch_size, 50);
    }

    #[tokio::test]
    async fn test_every_candidate_is_accounted_for() {
        let names = ["Midnight Echo", "Velvet Thunder", "Qxzvbt", "Stone Harbor", "The Blue"];
        let response = pipeline().rank(&request(&names)).await.unwrap();
        let accounted = response.ranked_names.len() + response.rejected_names.len() + response.capped_names.len();
        assert_eq!(accounted, names.len());
        for (i, r) in response.ranked_names.iter().enumerate() {
            assert_eq!(r.rank, i + 1);
        }
        assert_eq!(response.analytics.distribution.count, names.len());
    }

    #[tokio::test]
    async fn test_invalid_request_is_configuration_error() {
        let mut bad = request(&["Ok Name"]);
        bad.ranking_mode = Some("alphabetical".into());
        let err = pipeline().rank(&bad).await.unwrap_err();
        assert!(matches!(err, crate::error::RankError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_events_are_emitted_in_order() {
        let (tx, mut rx) = mpsc::channel(64);
        let p = pipeline().with_events(tx);
        p.rank(&request(&["Silver Lining", "Echo Park"])).await.unwrap();
        drop(p);

        let mut kinds = Vec::new();
        while let Some(event) = rx.recv().await {
            kinds.push(match event {
                WorkflowEvent::RequestStarted { .. } => "started",
                WorkflowEvent::CandidateScored { .. } => "scored",
                WorkflowEvent::GateCompleted { .. } => "gate",
                WorkflowEvent::RankingCompleted { .. } => "ranking",
                WorkflowEvent::RequestCompleted { .. } => "completed",
            });
        }
        assert_eq!(kinds, vec!["started", "scored", "scored", "gate", "ranking", "completed"]);
    }
}
