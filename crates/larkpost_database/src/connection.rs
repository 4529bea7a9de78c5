//! Connection pool and migrations.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use larkpost_error::{StoreError, StoreErrorKind};
use tracing::{debug, info};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Pooled PostgreSQL connections.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Build a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`StoreErrorKind::Connection`] if the pool cannot open its
/// initial connections.
pub fn create_pool(database_url: &str, max_size: u32) -> Result<PgPool, StoreError> {
    debug!(max_size, "Creating PostgreSQL connection pool");
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| StoreError::new(StoreErrorKind::Connection(e.to_string())))
}

/// Run pending migrations.
pub fn run_migrations(conn: &mut PgConnection) -> Result<(), StoreError> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::new(StoreErrorKind::Migration(e.to_string())))?;
    if !applied.is_empty() {
        info!(count = applied.len(), "Applied database migrations");
    }
    Ok(())
}
