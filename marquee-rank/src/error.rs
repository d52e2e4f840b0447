//! Error types for marquee-rank
//!
//! Only malformed requests surface as errors from the pipeline. Analyzer
//! failures, gate failures and summary failures are absorbed at their stage
//! boundary and turned into degraded output.

use thiserror::Error;

/// Request-level error type
#[derive(Debug, Error)]
pub enum RankError {
    /// Malformed request (invalid ranking mode, out-of-range parameter, etc.)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// marquee-common error (configuration files, persistence)
    #[error("Common error: {0}")]
    Common(#[from] marquee_common::Error),
}

/// Result type for request-level operations
pub type RankResult<T> = Result<T, RankError>;

impl RankError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        RankError::Configuration(msg.into())
    }
}

/// Failure while summarizing a batch (positioning, analytics)
///
/// Never returned to callers; the affected summary falls back to its default.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}
