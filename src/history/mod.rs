//! Bounded record of recent decisions.
//!
//! The store is an injected collaborator with no transactional guarantees:
//! a flat list, most-recent-first, trimmed to a cap. Losing it is never an
//! error the user sees.

mod memory;
mod sqlite;

pub use memory::MemoryHistoryStore;
pub use sqlite::SqliteHistoryStore;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{Confidence, DecisionOutput, DecisionRequest, Mode, Recommendation};

/// One remembered submission, enough to list it and to reload the form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub mode: Option<Mode>,
    /// The decision text, or the free-text prompt for prompt-mode entries.
    pub decision: String,
    pub summary: String,
    pub recommendation: Recommendation,
    pub confidence: Option<Confidence>,
    pub output: DecisionOutput,
}

impl HistoryEntry {
    /// Record a successful submission.
    pub fn from_submission(request: &DecisionRequest, output: &DecisionOutput) -> Self {
        let decision = match &request.prompt {
            Some(prompt) if request.decision.trim().is_empty() => prompt.clone(),
            _ => request.decision.clone(),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            mode: request.mode,
            decision,
            summary: output.one_line_summary.clone(),
            recommendation: output.recommendation,
            confidence: output.confidence,
            output: output.clone(),
        }
    }
}

/// Storage seam for history. Implementations keep entries most-recent-first
/// and never grow past their cap.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn load(&self) -> Result<Vec<HistoryEntry>>;
    async fn save(&self, entry: &HistoryEntry) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}
