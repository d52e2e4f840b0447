//! Collaborator contracts
//!
//! The core consumes three kinds of external collaborators:
//! - **Analyzers** produce partial per-field scores for one name
//! - **Concept sources** answer word-association queries
//! - **Caches** memoize analyzer output by `(analyzer, name, context)`
//!
//! Implementations must never let a failure escape as a panic. Analyzer errors
//! are converted into empty partials by the runner in `analyzers`; concept
//! sources and caches have infallible signatures and degrade to empty/absent.

use crate::models::{NameContext, ScoreField};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Analyzer contract
// ============================================================================

/// Partial per-field scores reported by one analyzer
///
/// Fields the analyzer could not compute are simply absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialScoreBreakdown {
    /// Analyzer that produced this partial
    pub source: String,
    /// Analyzer's own confidence in these values (0.0-1.0)
    pub confidence: f64,
    pub fields: BTreeMap<ScoreField, f64>,
}

impl PartialScoreBreakdown {
    pub fn new(source: impl Into<String>, confidence: f64) -> Self {
        Self {
            source: source.into(),
            confidence: crate::math::unit(confidence, 0.0),
            fields: BTreeMap::new(),
        }
    }

    /// Result standing in for a failed or timed-out analyzer
    pub fn empty(source: impl Into<String>) -> Self {
        Self::new(source, 0.0)
    }

    /// Builder-style insert
    pub fn with(mut self, field: ScoreField, value: f64) -> Self {
        self.set(field, value);
        self
    }

    /// Record a value; non-finite values are dropped
    pub fn set(&mut self, field: ScoreField, value: f64) {
        if value.is_finite() {
            self.fields.insert(field, value.clamp(0.0, 1.0));
        }
    }

    pub fn get(&self, field: ScoreField) -> Option<f64> {
        self.fields.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Analyzer failure
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Call exceeded the configured timeout
    #[error("Analyzer timed out after {0:?}")]
    Timeout(Duration),

    /// Backing service unreachable or misconfigured
    #[error("Analyzer unavailable: {0}")]
    Unavailable(String),

    /// Name could not be analyzed (e.g. no letters)
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// Internal processing error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Per-name analyzer family (phonetic/rhythm, semantic, musicality synergy)
#[async_trait]
pub trait NameAnalyzer: Send + Sync {
    /// Analyzer name for provenance and cache keys
    fn name(&self) -> &'static str;

    /// Fields this analyzer normally reports
    fn fields(&self) -> &'static [ScoreField];

    /// Analyze one candidate name
    ///
    /// # Errors
    /// Any error is treated as analyzer unavailability for this name only.
    async fn analyze(
        &self,
        name: &str,
        ctx: &NameContext,
    ) -> Result<PartialScoreBreakdown, AnalyzerError>;
}

// ============================================================================
// Concept / word-association contract
// ============================================================================

/// Weighted association returned by a concept source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedConcept {
    pub word: String,
    /// Association strength (0.0-1.0)
    pub weight: f64,
}

/// Word-association service. Failures yield empty lists.
#[async_trait]
pub trait ConceptSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn related_concepts(&self, word: &str, limit: usize) -> Vec<RelatedConcept>;

    async fn synonyms(&self, word: &str, limit: usize) -> Vec<String>;
}

// ============================================================================
// Cache contract
// ============================================================================

/// Shared key/value cache. TTL is advisory; absence is never an error.
#[async_trait]
pub trait ScoreCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<serde_json::Value>;

    async fn set(&self, key: &str, value: serde_json::Value, ttl: Duration);

    /// Returns whether an entry was removed
    async fn delete(&self, key: &str) -> bool;

    async fn exists(&self, key: &str) -> bool;
}
