//! PostgreSQL history store for larkpost.
//!
//! Published texts live in a single `post_history` table with a unique
//! constraint on `text`. Migrations are embedded and applied by
//! [`PostgresHistoryStore::connect`].
//!
//! # Example
//!
//! ```rust,ignore
//! use larkpost_database::PostgresHistoryStore;
//! use larkpost_interface::HistoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PostgresHistoryStore::connect("postgres://localhost/larkpost", 4).await?;
//! let recent = store.recent(20).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod connection;
mod models;
mod store;

/// Diesel table definitions.
pub mod schema;

pub use connection::{PgPool, create_pool, run_migrations};
pub use models::{NewPostHistoryRow, PostHistoryRow};
pub use store::PostgresHistoryStore;
