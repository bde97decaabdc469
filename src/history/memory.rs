//! In-memory history store, used by tests and as the fallback when
//! persistence is disabled.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{HistoryEntry, HistoryStore};

pub struct MemoryHistoryStore {
    entries: Mutex<Vec<HistoryEntry>>,
    cap: usize,
}

impl MemoryHistoryStore {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            cap,
        }
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn load(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.entries.lock().await.clone())
    }

    async fn save(&self, entry: &HistoryEntry) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(0, entry.clone());
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(self.cap);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.lock().await.clear();
        Ok(())
    }
}
