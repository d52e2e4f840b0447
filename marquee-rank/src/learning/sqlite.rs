//! SQLite learning store
//!
//! Persists learning history in a `threshold_history` table. Appends are
//! single `INSERT` statements, so the database provides atomicity.

use super::{LearningOutcome, LearningRecord, LearningStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marquee_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use tracing::{debug, info};

pub struct SqliteLearningStore {
    pool: SqlitePool,
}

impl SqliteLearningStore {
    /// Open (creating if needed) the database at `db_path`
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // mode=rwc: read, write, create
        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        debug!("Connecting to learning database: {}", db_url);

        let pool = SqlitePool::connect(&db_url).await?;
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating tables if needed
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        init_tables(&pool).await?;
        Ok(Self { pool })
    }
}

async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS threshold_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            context_key TEXT NOT NULL,
            threshold_used REAL NOT NULL,
            total INTEGER NOT NULL,
            qualified INTEGER NOT NULL,
            mean_qualified_score REAL NOT NULL,
            user_satisfaction REAL,
            recorded_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_threshold_history_key_time \
         ON threshold_history (context_key, recorded_at)",
    )
    .execute(pool)
    .await?;

    info!("Learning database tables initialized (threshold_history)");
    Ok(())
}

/// RFC 3339 with fixed-width fractional seconds so text order is time order
fn encode_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

#[async_trait]
impl LearningStore for SqliteLearningStore {
    async fn append(&self, record: LearningRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO threshold_history (
                context_key, threshold_used, total, qualified,
                mean_qualified_score, user_satisfaction, recorded_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.context_key)
        .bind(record.threshold_used)
        .bind(record.outcome.total as i64)
        .bind(record.outcome.qualified as i64)
        .bind(record.outcome.mean_qualified_score)
        .bind(record.outcome.user_satisfaction)
        .bind(encode_time(record.recorded_at))
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }

    async fn recent(&self, key: &str, since: DateTime<Utc>, limit: usize) -> Result<Vec<LearningRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT context_key, threshold_used, total, qualified,
                   mean_qualified_score, user_satisfaction, recorded_at
            FROM threshold_history
            WHERE context_key = ? AND recorded_at >= ?
            ORDER BY recorded_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(key)
        .bind(encode_time(since))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let recorded_at: String = row.get("recorded_at");
                let recorded_at = DateTime::parse_from_rfc3339(&recorded_at)
                    .map_err(|e| Error::Internal(format!("Failed to parse recorded_at: {}", e)))?
                    .with_timezone(&Utc);
                let total: i64 = row.get("total");
                let qualified: i64 = row.get("qualified");

                Ok(LearningRecord {
                    context_key: row.get("context_key"),
                    threshold_used: row.get("threshold_used"),
                    outcome: LearningOutcome {
                        total: total.max(0) as usize,
                        qualified: qualified.max(0) as usize,
                        mean_qualified_score: row.get("mean_qualified_score"),
                        user_satisfaction: row.get("user_satisfaction"),
                    },
                    recorded_at,
                })
            })
            .collect()
    }

    async fn prune(&self, before: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM threshold_history WHERE recorded_at < ?")
            .bind(encode_time(before))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
