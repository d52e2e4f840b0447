//! Analysis caching
//!
//! `MemoryCache` is the in-process `ScoreCache`; `CachedAnalyzer` wraps any
//! `NameAnalyzer` so that repeated `(analyzer, name, context)` lookups are
//! served from a cache. Only successful analyses are stored.

mod memory;

pub use memory::{CacheStats, MemoryCache};

use crate::models::{NameContext, ScoreField};
use crate::types::{AnalyzerError, NameAnalyzer, PartialScoreBreakdown, ScoreCache};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Cache key for one analyzer/name/context triple
pub fn analysis_key(analyzer: &str, name: &str, ctx: &NameContext) -> String {
    format!(
        "analysis:{}:{}:{}",
        analyzer,
        name.trim().to_lowercase(),
        ctx.cache_key()
    )
}

/// Read-through cache decorator for an analyzer
pub struct CachedAnalyzer {
    inner: Arc<dyn NameAnalyzer>,
    cache: Arc<dyn ScoreCache>,
    ttl: Duration,
}

impl CachedAnalyzer {
    pub fn new(inner: Arc<dyn NameAnalyzer>, cache: Arc<dyn ScoreCache>, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    /// Wrap every analyzer of a set with the same cache
    pub fn wrap_all(
        analyzers: Vec<Arc<dyn NameAnalyzer>>,
        cache: Arc<dyn ScoreCache>,
        ttl: Duration,
    ) -> Vec<Arc<dyn NameAnalyzer>> {
        analyzers
            .into_iter()
            .map(|a| Arc::new(CachedAnalyzer::new(a, Arc::clone(&cache), ttl)) as Arc<dyn NameAnalyzer>)
            .collect()
    }
}

#[async_trait]
impl NameAnalyzer for CachedAnalyzer {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn fields(&self) -> &'static [ScoreField] {
        self.inner.fields()
    }

    async fn analyze(
        &self,
        name: &str,
        ctx: &NameContext,
    ) -> Result<PartialScoreBreakdown, AnalyzerError> {
        let key = analysis_key(self.inner.name(), name, ctx);

        if let Some(value) = self.cache.get(&key).await {
            match serde_json::from_value::<PartialScoreBreakdown>(value) {
                Ok(partial) => {
                    debug!(key = %key, "Analysis cache hit");
                    return Ok(partial);
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Discarding unreadable cache entry");
                    self.cache.delete(&key).await;
                }
            }
        }

        let partial = self.inner.analyze(name, ctx).await?;
        match serde_json::to_value(&partial) {
            Ok(value) => self.cache.set(&key, value, self.ttl).await,
            Err(e) => warn!(key = %key, error = %e, "Failed to serialize analysis for cache"),
        }
        Ok(partial)
    }
}
