//! PostgreSQL [`HistoryStore`].

use crate::connection::{PgPool, create_pool, run_migrations};
use crate::models::{NewPostHistoryRow, PostHistoryRow};
use crate::schema::post_history;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use larkpost_core::{HistoryEntry, NewHistoryEntry};
use larkpost_error::{StoreError, StoreErrorKind};
use larkpost_interface::HistoryStore;
use std::sync::Arc;
use tracing::{debug, instrument};

/// History store backed by the `post_history` table.
///
/// Uniqueness of `text` is enforced by the table's unique constraint, so
/// concurrent inserts of the same text from separate processes still yield
/// exactly one row.
#[derive(Clone)]
pub struct PostgresHistoryStore {
    pool: Arc<PgPool>,
}

impl std::fmt::Debug for PostgresHistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresHistoryStore")
            .field("max_size", &self.pool.max_size())
            .finish()
    }
}

impl PostgresHistoryStore {
    /// Wrap an existing pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and apply pending migrations.
    #[instrument(skip(database_url))]
    pub async fn connect(database_url: &str, max_size: u32) -> Result<Self, StoreError> {
        let url = database_url.to_string();
        let pool = tokio::task::spawn_blocking(move || -> Result<PgPool, StoreError> {
            let pool = create_pool(&url, max_size)?;
            let mut conn = pool.get()?;
            run_migrations(&mut conn)?;
            Ok(pool)
        })
        .await
        .map_err(|e| StoreError::new(StoreErrorKind::Connection(e.to_string())))??;

        debug!("PostgreSQL history store ready");
        Ok(Self::new(Arc::new(pool)))
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> Result<T, StoreError> + Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::new(StoreErrorKind::Query(format!("blocking task failed: {}", e))))?
    }
}

#[async_trait]
impl HistoryStore for PostgresHistoryStore {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        self.with_conn(|conn| {
            let rows = post_history::table
                .order(post_history::id.asc())
                .select(PostHistoryRow::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(HistoryEntry::from).collect())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.with_conn(move |conn| {
            let mut rows = post_history::table
                .order(post_history::id.desc())
                .limit(limit)
                .select(PostHistoryRow::as_select())
                .load(conn)?;
            rows.reverse();
            Ok(rows.into_iter().map(HistoryEntry::from).collect())
        })
        .await
    }

    #[instrument(skip(self, text))]
    async fn exists(&self, text: &str) -> Result<bool, StoreError> {
        let text = text.to_string();
        self.with_conn(move |conn| {
            let found = diesel::select(diesel::dsl::exists(
                post_history::table.filter(post_history::text.eq(&text)),
            ))
            .get_result::<bool>(conn)?;
            Ok(found)
        })
        .await
    }

    #[instrument(skip(self, entry), fields(text_len = entry.text().chars().count()))]
    async fn insert(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, StoreError> {
        self.with_conn(move |conn| {
            let row = diesel::insert_into(post_history::table)
                .values(&NewPostHistoryRow {
                    text: entry.text(),
                    post_id: entry.post_id().as_deref(),
                })
                .returning(PostHistoryRow::as_returning())
                .get_result(conn)?;
            debug!(id = row.id, "Recorded history entry");
            Ok(HistoryEntry::from(row))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<usize, StoreError> {
        self.with_conn(|conn| {
            let n: i64 = post_history::table.count().get_result(conn)?;
            Ok(usize::try_from(n).unwrap_or(0))
        })
        .await
    }
}
