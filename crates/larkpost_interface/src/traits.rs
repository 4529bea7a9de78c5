//! Trait definitions for the generator, poster and history store.

use crate::PostId;
use async_trait::async_trait;
use larkpost_core::{GenerationRequest, HistoryEntry, NewHistoryEntry};
use larkpost_error::{GeneratorError, PosterError, StoreError};

/// A text generation backend.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate text for a prompt, given previously published posts as context.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gemini-1.5-flash-latest").
    fn model_name(&self) -> &str;
}

/// A social platform that publishes text.
#[async_trait]
pub trait Poster: Send + Sync {
    /// Publish `text` publicly.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Authentication fails
    /// - The platform rejects the content
    /// - Rate limit exceeded
    /// - The request cannot be delivered
    async fn post(&self, text: &str) -> Result<PostId, PosterError>;

    /// Platform name (e.g., "x", "noop").
    fn platform_name(&self) -> &str;
}

/// Append-only log of published texts.
///
/// Implementations must reject an insert whose text is already stored with
/// [`StoreErrorKind::Duplicate`](larkpost_error::StoreErrorKind::Duplicate).
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Every entry, oldest first.
    async fn list_all(&self) -> Result<Vec<HistoryEntry>, StoreError>;

    /// The `limit` most recent entries, oldest first.
    async fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, StoreError>;

    /// Whether an entry with exactly this text exists.
    async fn exists(&self, text: &str) -> Result<bool, StoreError>;

    /// Record a published text.
    async fn insert(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, StoreError>;

    /// Number of stored entries.
    async fn count(&self) -> Result<usize, StoreError>;
}
