//! One publish attempt, end to end.

use crate::settings::PublishSettings;
use larkpost_core::{
    GenerationRequest, HistoryEntry, NewHistoryEntry, PromptCategory, PromptSet, PublishResult,
    truncate_chars,
};
use larkpost_error::{
    GeneratorError, GeneratorErrorKind, PosterError, PosterErrorKind, StoreError, StoreErrorKind,
};
use larkpost_interface::{ContentGenerator, HistoryStore, PostId, Poster};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

/// Run `future` under a timeout, mapping elapse to `on_timeout(secs)`.
async fn bounded<T, E, F>(secs: u64, future: F, on_timeout: impl FnOnce(u64) -> E) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(Duration::from_secs(secs), future).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout(secs)),
    }
}

/// Generates, dedups, posts and records one text per call.
///
/// Calls are serialized by an internal lock held for the whole attempt, so a
/// manual trigger racing the scheduler observes the first attempt's history
/// entry and reports a duplicate instead of posting twice.
pub struct PublishWorkflow {
    prompts: PromptSet,
    generator: Arc<dyn ContentGenerator>,
    poster: Arc<dyn Poster>,
    store: Arc<dyn HistoryStore>,
    settings: PublishSettings,
    lock: Mutex<()>,
}

impl std::fmt::Debug for PublishWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishWorkflow")
            .field("prompts", &self.prompts.len())
            .field("generator", &self.generator.provider_name())
            .field("poster", &self.poster.platform_name())
            .field("settings", &self.settings)
            .finish()
    }
}

impl PublishWorkflow {
    /// Assemble a workflow from its collaborators.
    pub fn new(
        prompts: PromptSet,
        generator: Arc<dyn ContentGenerator>,
        poster: Arc<dyn Poster>,
        store: Arc<dyn HistoryStore>,
        settings: PublishSettings,
    ) -> Self {
        Self {
            prompts,
            generator,
            poster,
            store,
            settings,
            lock: Mutex::new(()),
        }
    }

    /// The prompt categories this workflow chooses from.
    pub fn prompts(&self) -> &PromptSet {
        &self.prompts
    }

    /// The history store.
    pub fn store(&self) -> &Arc<dyn HistoryStore> {
        &self.store
    }

    /// Limits and timeouts.
    pub fn settings(&self) -> &PublishSettings {
        &self.settings
    }

    /// Run one publish attempt.
    ///
    /// Never fails: step errors become [`PublishResult::failure`].
    #[instrument(
        skip(self),
        fields(category = tracing::field::Empty, status = tracing::field::Empty)
    )]
    pub async fn publish_once(&self) -> PublishResult {
        let _guard = self.lock.lock().await;

        let category = {
            let mut rng = rand::thread_rng();
            self.prompts.choose(&mut rng).clone()
        };
        tracing::Span::current().record("category", category.name().as_str());
        debug!("Selected prompt category");

        let result = self.attempt(&category).await.with_category(category.name().clone());
        tracing::Span::current().record("status", tracing::field::display(result.status));

        match &result.error_detail {
            Some(detail) => error!(detail = %detail, "Publish attempt failed"),
            None => info!("Publish attempt finished"),
        }
        result
    }

    async fn attempt(&self, category: &PromptCategory) -> PublishResult {
        let context = match self.load_context().await {
            Ok(entries) => entries.into_iter().map(HistoryEntry::into_text).collect(),
            Err(e) => return PublishResult::failure(format!("history lookup failed: {}", e.kind)),
        };

        let request = GenerationRequest::new(category.description().clone()).with_context(context);
        let generated = match self.generate(&request).await {
            Ok(text) => text,
            Err(e) => return PublishResult::failure(format!("generation failed: {}", e.kind)),
        };

        let text = truncate_chars(generated.trim(), *self.settings.max_post_chars())
            .trim_end()
            .to_string();
        if text.is_empty() {
            return PublishResult::failure("generation failed: generator returned empty text");
        }
        debug!(
            generated_len = generated.chars().count(),
            text_len = text.chars().count(),
            "Prepared post text"
        );

        match self.exists(&text).await {
            Ok(true) => {
                info!(text = %text, "Generated text already published, skipping");
                return PublishResult::duplicate(text);
            }
            Ok(false) => {}
            Err(e) => {
                return PublishResult::failure(format!("history lookup failed: {}", e.kind))
                    .with_text(text);
            }
        }

        let post_id = match self.post(&text).await {
            Ok(id) => id,
            Err(e) => {
                return PublishResult::failure(format!("posting failed: {}", e.kind))
                    .with_text(text);
            }
        };
        info!(post_id = %post_id, "Posted to {}", self.poster.platform_name());

        let entry = NewHistoryEntry::new(text.clone(), Some(post_id.to_string()));
        let result = PublishResult::success(text, Some(post_id.0));
        match self.record(entry).await {
            Ok(_) => result,
            Err(e) => {
                warn!(
                    error = %e.kind,
                    "Post published but history write failed; text may be repeated later"
                );
                result.with_warning(format!("history write failed: {}", e.kind))
            }
        }
    }

    async fn load_context(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        let secs = *self.settings.store_timeout_secs();
        let limit = *self.settings.context_limit();
        if limit == 0 {
            bounded(secs, self.store.list_all(), store_timeout).await
        } else {
            bounded(secs, self.store.recent(limit), store_timeout).await
        }
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError> {
        bounded(
            *self.settings.generator_timeout_secs(),
            self.generator.generate(request),
            |secs| GeneratorError::new(GeneratorErrorKind::Timeout(secs)),
        )
        .await
    }

    async fn exists(&self, text: &str) -> Result<bool, StoreError> {
        bounded(
            *self.settings.store_timeout_secs(),
            self.store.exists(text),
            store_timeout,
        )
        .await
    }

    async fn post(&self, text: &str) -> Result<PostId, PosterError> {
        bounded(
            *self.settings.poster_timeout_secs(),
            self.poster.post(text),
            |secs| PosterError::new(PosterErrorKind::Timeout(secs)),
        )
        .await
    }

    async fn record(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, StoreError> {
        bounded(
            *self.settings.store_timeout_secs(),
            self.store.insert(entry),
            store_timeout,
        )
        .await
    }
}

fn store_timeout(secs: u64) -> StoreError {
    StoreError::new(StoreErrorKind::Timeout(secs))
}
