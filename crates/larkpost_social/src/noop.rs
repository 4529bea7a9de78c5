//! Poster that only logs.

use async_trait::async_trait;
use larkpost_error::PosterError;
use larkpost_interface::{PostId, Poster};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Poster that logs the text and returns a synthetic id.
///
/// Used for dry runs, where the full workflow (including history writes)
/// should run without publishing anything.
#[derive(Debug, Default)]
pub struct NoOpPoster {
    posted: AtomicU64,
}

impl NoOpPoster {
    /// Create a new no-op poster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of texts "posted" so far.
    pub fn posted(&self) -> u64 {
        self.posted.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Poster for NoOpPoster {
    async fn post(&self, text: &str) -> Result<PostId, PosterError> {
        let n = self.posted.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            text_len = text.chars().count(),
            text = %text,
            "NoOpPoster: post() called (no action taken)"
        );
        Ok(PostId(format!("dry-run-{}", n)))
    }

    fn platform_name(&self) -> &str {
        "noop"
    }
}
