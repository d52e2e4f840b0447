//! Request workflow
//!
//! Runs one ranking request end to end:
//! - **Phase 1**: Validation of the raw request
//! - **Phase 2**: Concurrent per-candidate analysis (analyzers joined per name)
//! - **Phase 3**: Aggregation into scored candidates
//! - **Phase 4**: Quality gate (with fallback) and learning record
//! - **Phase 5**: Comparative ranking
//! - **Phase 6**: Analytics

pub mod pipeline;

pub use pipeline::{Pipeline, PipelineConfig};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Progress events emitted while a request is processed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkflowEvent {
    /// Request passed validation and analysis is starting
    RequestStarted {
        request_id: Uuid,
        candidates: usize,
        /// Unix timestamp (seconds since epoch)
        timestamp: i64,
    },

    /// One candidate finished analysis and aggregation
    CandidateScored {
        request_id: Uuid,
        name: String,
        overall_score: f64,
        confidence: f64,
    },

    /// Quality gate finished
    GateCompleted {
        request_id: Uuid,
        threshold_used: f64,
        qualified: usize,
        rejected: usize,
        fallback_triggered: bool,
        emergency: bool,
    },

    /// Final ordering is fixed
    RankingCompleted {
        request_id: Uuid,
        ranked: usize,
        capped: usize,
    },

    /// Response is ready
    RequestCompleted {
        request_id: Uuid,
        duration_ms: u64,
        timestamp: i64,
    },
}
