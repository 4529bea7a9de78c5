//! Posting history records.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A previously published text.
///
/// The text is the identity for deduplication; `post_id` and `posted_at` are
/// bookkeeping added by the store.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use larkpost_core::HistoryEntry;
///
/// let entry = HistoryEntry::new("Hello world", Some("1850".to_string()), Utc::now());
/// assert_eq!(entry.text(), "Hello world");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct HistoryEntry {
    /// Published text
    text: String,
    /// Identifier the platform assigned to the post
    post_id: Option<String>,
    /// When the entry was recorded
    posted_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create a history entry.
    pub fn new(text: impl Into<String>, post_id: Option<String>, posted_at: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            post_id,
            posted_at,
        }
    }

    /// Consume the entry, returning the text.
    pub fn into_text(self) -> String {
        self.text
    }
}

/// A history entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct NewHistoryEntry {
    /// Published text
    text: String,
    /// Identifier the platform assigned to the post
    post_id: Option<String>,
}

impl NewHistoryEntry {
    /// Create a pending history entry.
    pub fn new(text: impl Into<String>, post_id: Option<String>) -> Self {
        Self {
            text: text.into(),
            post_id,
        }
    }
}
