//! In-memory learning store
//!
//! History is kept per context key, each key behind its own mutex so that
//! requests for different contexts never contend.

use super::{LearningRecord, LearningStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

type History = Arc<Mutex<Vec<LearningRecord>>>;

#[derive(Debug, Default)]
pub struct InMemoryLearningStore {
    histories: RwLock<HashMap<String, History>>,
}

impl InMemoryLearningStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn history(&self, key: &str) -> Option<History> {
        self.histories.read().await.get(key).cloned()
    }

    async fn history_or_insert(&self, key: &str) -> History {
        if let Some(h) = self.history(key).await {
            return h;
        }
        let mut histories = self.histories.write().await;
        Arc::clone(histories.entry(key.to_string()).or_default())
    }
}

#[async_trait]
impl LearningStore for InMemoryLearningStore {
    async fn append(&self, record: LearningRecord) -> marquee_common::Result<()> {
        let history = self.history_or_insert(&record.context_key).await;
        history.lock().await.push(record);
        Ok(())
    }

    async fn recent(
        &self,
        key: &str,
        since: DateTime<Utc>,
        limit: usize,
    ) -> marquee_common::Result<Vec<LearningRecord>> {
        let Some(history) = self.history(key).await else {
            return Ok(Vec::new());
        };
        let records = history.lock().await;
        let mut recent: Vec<LearningRecord> = records
            .iter()
            .filter(|r| r.recorded_at >= since)
            .cloned()
            .collect();
        // Appends are chronological; reverse for newest first, stable on ties
        recent.reverse();
        recent.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        recent.truncate(limit);
        Ok(recent)
    }

    async fn prune(&self, before: DateTime<Utc>) -> marquee_common::Result<u64> {
        let histories: Vec<History> = self.histories.read().await.values().cloned().collect();
        let mut removed = 0u64;
        for history in histories {
            let mut records = history.lock().await;
            let len = records.len();
            records.retain(|r| r.recorded_at >= before);
            removed += (len - records.len()) as u64;
        }
        Ok(removed)
    }
}
