//! Adaptive threshold learning
//!
//! Every gate run may append a `LearningRecord` for its context key. The
//! adaptive threshold mode reads the recent history for the same key and
//! derives a learned threshold from it.
//!
//! # Weighting
//! Each record contributes `w = recency * success`:
//! - `recency = 0.5^(age / half_life)`, `half_life = window / 2`
//! - `success` is the user satisfaction when given, else how close the
//!   accepted ratio was to one half (`1 - |ratio - 0.5| * 2`), clamped to
//!   [0.05, 1]
//!
//! The store is injected; there is no process-wide history.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryLearningStore;
pub use sqlite::SqliteLearningStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marquee_common::config::LearningSettings;
use marquee_common::time::{age_hours, window_start};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Lower bound of a record's success weight
pub const MIN_SUCCESS_WEIGHT: f64 = 0.05;

/// What happened when a threshold was applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningOutcome {
    pub total: usize,
    pub qualified: usize,
    pub mean_qualified_score: f64,
    #[serde(default)]
    pub user_satisfaction: Option<f64>,
}

impl LearningOutcome {
    pub fn accepted_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.qualified as f64 / self.total as f64
    }

    /// Success weight in [0.05, 1]
    pub fn success(&self) -> f64 {
        let raw = match self.user_satisfaction {
            Some(s) if s.is_finite() => s,
            _ => 1.0 - (self.accepted_ratio() - 0.5).abs() * 2.0,
        };
        raw.clamp(MIN_SUCCESS_WEIGHT, 1.0)
    }
}

/// One append-only history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningRecord {
    pub context_key: String,
    /// Threshold the batch ended on, minus the contextual and preference
    /// offsets, so it blends back in as a base
    pub threshold_used: f64,
    pub outcome: LearningOutcome,
    pub recorded_at: DateTime<Utc>,
}

/// Context-keyed learning history
#[async_trait]
pub trait LearningStore: Send + Sync {
    /// Append one record
    async fn append(&self, record: LearningRecord) -> marquee_common::Result<()>;

    /// Records for `key` at or after `since`, newest first, at most `limit`
    async fn recent(
        &self,
        key: &str,
        since: DateTime<Utc>,
        limit: usize,
    ) -> marquee_common::Result<Vec<LearningRecord>>;

    /// Delete records older than `before`; returns how many were removed
    async fn prune(&self, before: DateTime<Utc>) -> marquee_common::Result<u64>;
}

/// Learning parameters used by the threshold manager
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveSettings {
    pub window_hours: u64,
    pub max_records: usize,
    /// Weight of the mode base when blending with the learned threshold
    pub stability_factor: f64,
}

impl Default for AdaptiveSettings {
    fn default() -> Self {
        Self::from(&LearningSettings::default())
    }
}

impl From<&LearningSettings> for AdaptiveSettings {
    fn from(s: &LearningSettings) -> Self {
        Self {
            window_hours: s.feedback_window_hours,
            max_records: s.max_records,
            stability_factor: s.stability_factor,
        }
    }
}

/// Recency- and success-weighted mean threshold of `records`
///
/// Returns `None` when there is no usable history.
pub fn learned_threshold(
    records: &[LearningRecord],
    now: DateTime<Utc>,
    settings: &AdaptiveSettings,
) -> Option<f64> {
    let half_life = (settings.window_hours as f64 / 2.0).max(f64::EPSILON);
    let mut weighted = 0.0;
    let mut total_weight = 0.0;

    for record in records.iter().take(settings.max_records) {
        if !record.threshold_used.is_finite() {
            continue;
        }
        let recency = 0.5_f64.powf(age_hours(now, record.recorded_at) / half_life);
        let w = recency * record.outcome.success();
        weighted += w * record.threshold_used;
        total_weight += w;
    }

    (total_weight > 0.0).then(|| weighted / total_weight)
}

/// Load recent history for `key` and compute its learned threshold
pub async fn learned_threshold_for(
    store: &Arc<dyn LearningStore>,
    key: &str,
    now: DateTime<Utc>,
    settings: &AdaptiveSettings,
) -> marquee_common::Result<Option<f64>> {
    let since = window_start(now, settings.window_hours);
    let records = store.recent(key, since, settings.max_records).await?;
    let learned = learned_threshold(&records, now, settings);
    debug!(
        context_key = %key,
        records = records.len(),
        learned = ?learned,
        "Computed learned threshold"
    );
    Ok(learned)
}

#[cfg(test)]
pub(crate) fn record_at(key: &str, threshold: f64, qualified: usize, total: usize, at: DateTime<Utc>) -> LearningRecord {
    LearningRecord {
        context_key: key.to_string(),
        threshold_used: threshold,
        outcome: LearningOutcome {
            total,
            qualified,
            mean_qualified_score: threshold,
            user_satisfaction: None,
        },
        recorded_at: at,
    }
}
