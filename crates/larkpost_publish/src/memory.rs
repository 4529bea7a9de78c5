//! Process-local history store.

use async_trait::async_trait;
use chrono::Utc;
use larkpost_core::{HistoryEntry, NewHistoryEntry};
use larkpost_error::{StoreError, StoreErrorKind};
use larkpost_interface::HistoryStore;
use tokio::sync::RwLock;
use tracing::debug;

/// History kept in memory, lost on restart.
///
/// Rejects inserts of already-recorded text like the database store does.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    entries: RwLock<Vec<HistoryEntry>>,
}

impl InMemoryHistoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with texts, oldest first.
    pub fn with_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let now = Utc::now();
        let entries = texts
            .into_iter()
            .map(|text| HistoryEntry::new(text, None, now))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn list_all(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(self.entries.read().await.clone())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, StoreError> {
        let entries = self.entries.read().await;
        let start = entries.len().saturating_sub(limit);
        Ok(entries[start..].to_vec())
    }

    async fn exists(&self, text: &str) -> Result<bool, StoreError> {
        Ok(self.entries.read().await.iter().any(|e| e.text() == text))
    }

    async fn insert(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, StoreError> {
        let mut entries = self.entries.write().await;
        if entries.iter().any(|e| e.text() == entry.text()) {
            return Err(StoreError::new(StoreErrorKind::Duplicate));
        }
        let stored = HistoryEntry::new(entry.text().clone(), entry.post_id().clone(), Utc::now());
        entries.push(stored.clone());
        debug!(count = entries.len(), "Recorded history entry in memory");
        Ok(stored)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.entries.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_rejects_existing_text() {
        let store = InMemoryHistoryStore::new();
        store
            .insert(NewHistoryEntry::new("Hello world", None))
            .await
            .unwrap();
        let err = store
            .insert(NewHistoryEntry::new("Hello world", None))
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_recent_returns_tail_oldest_first() {
        let store = InMemoryHistoryStore::with_texts(["a", "b", "c", "d"]);
        let recent: Vec<String> = store
            .recent(2)
            .await
            .unwrap()
            .into_iter()
            .map(HistoryEntry::into_text)
            .collect();
        assert_eq!(recent, vec!["c", "d"]);
        assert_eq!(store.recent(10).await.unwrap().len(), 4);
        assert!(store.recent(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_exists_is_exact_match() {
        let store = InMemoryHistoryStore::with_texts(["Hello world"]);
        assert!(store.exists("Hello world").await.unwrap());
        assert!(!store.exists("hello world").await.unwrap());
        assert!(!store.exists("Hello world ").await.unwrap());
    }
}
