//! Score fusion
//!
//! Turns per-analyzer partials into immutable `ScoredCandidate`s.

pub mod aggregator;

pub use aggregator::{quality_vector, AnalysisInput, DimensionAggregator};
