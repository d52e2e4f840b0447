//! Comparative ranking
//!
//! Orders the candidates that passed the quality gate. See `engine` for the
//! stage sequence.

pub mod competitive;
pub mod diversity;
pub mod engine;
pub mod positioning;
pub mod weights;

pub use engine::{RankingEngine, RankingOptions, RankingOutput};
