//! Diesel row types for `post_history`.

use crate::schema::post_history;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use larkpost_core::HistoryEntry;

/// A stored `post_history` row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = post_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostHistoryRow {
    /// Insertion order
    pub id: i64,
    /// Published text (unique)
    pub text: String,
    /// Platform post id
    pub post_id: Option<String>,
    /// Insert time
    pub posted_at: DateTime<Utc>,
}

impl From<PostHistoryRow> for HistoryEntry {
    fn from(row: PostHistoryRow) -> Self {
        HistoryEntry::new(row.text, row.post_id, row.posted_at)
    }
}

/// Insertable `post_history` row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = post_history)]
pub struct NewPostHistoryRow<'a> {
    /// Published text
    pub text: &'a str,
    /// Platform post id
    pub post_id: Option<&'a str>,
}
