//! SQLite-backed history store.

use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use super::{HistoryEntry, HistoryStore};
use crate::api::DecisionOutput;

pub struct SqliteHistoryStore {
    db: SqlitePool,
    cap: usize,
}

impl SqliteHistoryStore {
    /// Open (creating the file and schema if needed) a store at `path`.
    pub async fn open(path: &Path, cap: usize) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))?
            .create_if_missing(true);
        let db = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS decision_history (
                id TEXT PRIMARY KEY,
                timestamp INTEGER NOT NULL,
                mode TEXT,
                decision TEXT NOT NULL,
                summary TEXT NOT NULL,
                recommendation TEXT NOT NULL,
                confidence TEXT,
                output TEXT NOT NULL
            )
            "#,
        )
        .execute(&db)
        .await?;

        Ok(Self { db, cap })
    }

    pub fn from_pool(db: SqlitePool, cap: usize) -> Self {
        Self { db, cap }
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn load(&self) -> Result<Vec<HistoryEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, timestamp, mode, decision, summary, recommendation, confidence, output
            FROM decision_history
            ORDER BY timestamp DESC, rowid DESC
            LIMIT $1
            "#,
        )
        .bind(self.cap as i64)
        .fetch_all(&self.db)
        .await?;

        let entries = rows
            .into_iter()
            .filter_map(|row| {
                let id: String = row.get("id");
                let timestamp_ms: i64 = row.get("timestamp");
                let mode: Option<String> = row.get("mode");
                let decision: String = row.get("decision");
                let summary: String = row.get("summary");
                let recommendation: String = row.get("recommendation");
                let confidence: Option<String> = row.get("confidence");
                let output_json: String = row.get("output");

                // Rows that no longer decode are skipped, not fatal.
                let output: DecisionOutput = serde_json::from_str(&output_json).ok()?;
                let timestamp = DateTime::<Utc>::from_timestamp_millis(timestamp_ms)?;

                Some(HistoryEntry {
                    id,
                    timestamp,
                    mode: mode.and_then(|m| serde_json::from_value(m.into()).ok()),
                    decision,
                    summary,
                    recommendation: serde_json::from_value(recommendation.into()).ok()?,
                    confidence: confidence.and_then(|c| serde_json::from_value(c.into()).ok()),
                    output,
                })
            })
            .collect();

        Ok(entries)
    }

    async fn save(&self, entry: &HistoryEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO decision_history
                (id, timestamp, mode, decision, summary, recommendation, confidence, output)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&entry.id)
        .bind(entry.timestamp.timestamp_millis())
        .bind(entry.mode.map(|m| json_string(&m)))
        .bind(&entry.decision)
        .bind(&entry.summary)
        .bind(json_string(&entry.recommendation))
        .bind(entry.confidence.map(|c| json_string(&c)))
        .bind(serde_json::to_string(&entry.output)?)
        .execute(&self.db)
        .await?;

        // Trim to cap, oldest first.
        sqlx::query(
            r#"
            DELETE FROM decision_history
            WHERE id NOT IN (
                SELECT id FROM decision_history
                ORDER BY timestamp DESC, rowid DESC
                LIMIT $1
            )
            "#,
        )
        .bind(self.cap as i64)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM decision_history")
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Serialize a unit enum to its bare wire string ("A", "High", "career").
fn json_string<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}
