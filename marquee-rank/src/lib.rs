//! # Marquee Rank
//!
//! Name quality ranking for band and song name candidates.
//!
//! A request flows through three stages:
//! - **Scoring**: pluggable analyzers report partial sub-scores, which are
//!   fused into a `ScoreBreakdown` and a five-dimension `QualityVector`
//! - **Quality gate**: a context- and history-sensitive threshold with
//!   bounded emergency fallback decides which candidates qualify
//! - **Ranking**: pairwise competitive analysis, mode-weighted scoring and
//!   optional diversity re-ordering produce the final list
//!
//! `workflow::Pipeline` runs all three for one request.

pub mod analytics;
pub mod analyzers;
pub mod cache;
pub mod error;
pub mod fusion;
pub mod gate;
pub mod learning;
pub mod math;
pub mod models;
pub mod ranking;
pub mod types;
pub mod workflow;

pub use error::{RankError, RankResult};
pub use models::{RankingRequest, RankingResponse};
pub use workflow::{Pipeline, PipelineConfig, WorkflowEvent};
