//! Built-in name analyzers
//!
//! Each analyzer implements `NameAnalyzer` and reports a subset of the
//! `ScoreBreakdown` fields. Analyzers are independent; the aggregator fuses
//! their partials.
//!
//! # Analyzers
//! 1. **phonetic** - sound and rhythm from spelling
//! 2. **semantic** - meaning, word associations, genre vocabulary
//! 3. **musicality** - fit between sound and mood/genre
//!
//! # Failure isolation
//! `run_analyzer` wraps every call in a timeout. A failed or timed-out
//! analyzer contributes an empty partial; the candidate's confidence drops
//! but the batch continues.

pub mod concept;
pub mod musicality;
pub mod phonetic;
pub mod semantic;
mod text;

pub use concept::{ConceptNetClient, StaticLexicon};
pub use musicality::MusicalityAnalyzer;
pub use phonetic::PhoneticAnalyzer;
pub use semantic::SemanticAnalyzer;

use crate::models::NameContext;
use crate::types::{AnalyzerError, ConceptSource, NameAnalyzer, PartialScoreBreakdown};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// The default analyzer set over the given concept source
pub fn default_analyzers(concepts: Arc<dyn ConceptSource>) -> Vec<Arc<dyn NameAnalyzer>> {
    vec![
        Arc::new(PhoneticAnalyzer::new()),
        Arc::new(SemanticAnalyzer::new(concepts)),
        Arc::new(MusicalityAnalyzer::new()),
    ]
}

/// Run one analyzer with a timeout; failures become an empty partial
pub async fn run_analyzer(
    analyzer: &dyn NameAnalyzer,
    name: &str,
    ctx: &NameContext,
    timeout: Duration,
) -> PartialScoreBreakdown {
    let result = match tokio::time::timeout(timeout, analyzer.analyze(name, ctx)).await {
        Ok(result) => result,
        Err(_) => Err(AnalyzerError::Timeout(timeout)),
    };

    match result {
        Ok(partial) => partial,
        Err(e) => {
            warn!(
                analyzer = analyzer.name(),
                name = %name,
                error = %e,
                "Analyzer failed; continuing without its scores"
            );
            PartialScoreBreakdown::empty(analyzer.name())
        }
    }
}

/// Run every analyzer concurrently for one name, in analyzer order
pub async fn run_all(
    analyzers: &[Arc<dyn NameAnalyzer>],
    name: &str,
    ctx: &NameContext,
    timeout: Duration,
) -> Vec<PartialScoreBreakdown> {
    join_all(
        analyzers
            .iter()
            .map(|a| run_analyzer(a.as_ref(), name, ctx, timeout)),
    )
    .await
}
