//! Publish workflow tests with spy collaborators.

use async_trait::async_trait;
use larkpost_core::{
    GenerationRequest, HistoryEntry, NewHistoryEntry, PromptCategory, PromptSet, PublishStatus,
};
use larkpost_error::{
    GeneratorError, GeneratorErrorKind, PosterError, PosterErrorKind, StoreError, StoreErrorKind,
};
use larkpost_interface::{ContentGenerator, HistoryStore, PostId, Poster};
use larkpost_publish::{InMemoryHistoryStore, PublishSettings, PublishSettingsBuilder, PublishWorkflow};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

// ============================================================================
// Spy collaborators
// ============================================================================

/// Generator returning a fixed text and recording requests.
struct FixedGenerator {
    text: String,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl FixedGenerator {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn slow(text: impl Into<String>, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(text)
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> GenerationRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl ContentGenerator for FixedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.text.clone())
    }

    fn provider_name(&self) -> &'static str {
        "fixed"
    }

    fn model_name(&self) -> &str {
        "fixed-model"
    }
}

/// Generator that always fails.
struct FailingGenerator;

#[async_trait]
impl ContentGenerator for FailingGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GeneratorError> {
        Err(GeneratorError::new(GeneratorErrorKind::HttpStatus {
            status_code: 503,
            message: "unavailable".to_string(),
        }))
    }

    fn provider_name(&self) -> &'static str {
        "failing"
    }

    fn model_name(&self) -> &str {
        "failing-model"
    }
}

/// Poster recording every text it is asked to publish.
#[derive(Default)]
struct SpyPoster {
    fail: bool,
    posted: Mutex<Vec<String>>,
}

impl SpyPoster {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn posted(&self) -> Vec<String> {
        self.posted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Poster for SpyPoster {
    async fn post(&self, text: &str) -> Result<PostId, PosterError> {
        self.posted.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(PosterError::new(PosterErrorKind::Rejected {
                status_code: 403,
                message: "forbidden".to_string(),
            }));
        }
        Ok(PostId(format!("post-{}", self.posted.lock().unwrap().len())))
    }

    fn platform_name(&self) -> &str {
        "spy"
    }
}

/// In-memory store with switchable failures.
#[derive(Default)]
struct FlakyStore {
    inner: InMemoryHistoryStore,
    fail_recent: AtomicBool,
    fail_exists: AtomicBool,
    fail_insert: AtomicBool,
    list_all_calls: AtomicUsize,
}

fn store_down() -> StoreError {
    StoreError::new(StoreErrorKind::Connection("store down".to_string()))
}

#[async_trait]
impl HistoryStore for FlakyStore {
    async fn list_all(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        self.list_all_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_recent.load(Ordering::SeqCst) {
            return Err(store_down());
        }
        self.inner.list_all().await
    }

    async fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, StoreError> {
        if self.fail_recent.load(Ordering::SeqCst) {
            return Err(store_down());
        }
        self.inner.recent(limit).await
    }

    async fn exists(&self, text: &str) -> Result<bool, StoreError> {
        if self.fail_exists.load(Ordering::SeqCst) {
            return Err(store_down());
        }
        self.inner.exists(text).await
    }

    async fn insert(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, StoreError> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(store_down());
        }
        self.inner.insert(entry).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.inner.count().await
    }
}

fn single_prompt() -> PromptSet {
    PromptSet::new(vec![PromptCategory::new("A", "desc-A")]).unwrap()
}

fn workflow(
    generator: Arc<dyn ContentGenerator>,
    poster: Arc<dyn Poster>,
    store: Arc<dyn HistoryStore>,
    settings: PublishSettings,
) -> PublishWorkflow {
    PublishWorkflow::new(single_prompt(), generator, poster, store, settings)
}

// ============================================================================
// End-to-end behavior
// ============================================================================

#[tokio::test]
async fn test_publish_then_duplicate() {
    let generator = Arc::new(FixedGenerator::new("Hello world"));
    let poster = Arc::new(SpyPoster::default());
    let store = Arc::new(InMemoryHistoryStore::new());
    let wf = workflow(
        generator.clone(),
        poster.clone(),
        store.clone(),
        PublishSettings::default(),
    );

    let first = wf.publish_once().await;
    assert_eq!(first.status, PublishStatus::Success);
    assert_eq!(first.text.as_deref(), Some("Hello world"));
    assert_eq!(first.category.as_deref(), Some("A"));
    assert_eq!(first.post_id.as_deref(), Some("post-1"));
    assert!(first.warning.is_none());

    let history = store.list_all().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].text(), "Hello world");
    assert_eq!(history[0].post_id().as_deref(), Some("post-1"));

    let second = wf.publish_once().await;
    assert_eq!(second.status, PublishStatus::Duplicate);
    assert_eq!(second.text.as_deref(), Some("Hello world"));

    assert_eq!(poster.posted(), vec!["Hello world"]);
    assert_eq!(store.count().await.unwrap(), 1);
    assert_eq!(generator.calls(), 2);
}

#[tokio::test]
async fn test_generator_receives_prompt_and_context() {
    let generator = Arc::new(FixedGenerator::new("fresh"));
    let store = Arc::new(InMemoryHistoryStore::with_texts(["old one", "old two"]));
    let wf = workflow(
        generator.clone(),
        Arc::new(SpyPoster::default()),
        store,
        PublishSettings::default(),
    );

    wf.publish_once().await;

    let request = generator.last_request();
    assert_eq!(request.prompt, "desc-A");
    assert_eq!(request.context, vec!["old one", "old two"]);
}

#[tokio::test]
async fn test_context_is_capped_to_most_recent() {
    let texts: Vec<String> = (0..25).map(|i| format!("post {}", i)).collect();
    let generator = Arc::new(FixedGenerator::new("fresh"));
    let wf = workflow(
        generator.clone(),
        Arc::new(SpyPoster::default()),
        Arc::new(InMemoryHistoryStore::with_texts(texts.clone())),
        PublishSettingsBuilder::default()
            .context_limit(20_usize)
            .build()
            .unwrap(),
    );

    wf.publish_once().await;

    let context = generator.last_request().context;
    assert_eq!(context.len(), 20);
    assert_eq!(context.first().map(String::as_str), Some("post 5"));
    assert_eq!(context.last().map(String::as_str), Some("post 24"));
}

#[tokio::test]
async fn test_zero_context_limit_sends_full_history() {
    let texts: Vec<String> = (0..25).map(|i| format!("post {}", i)).collect();
    let generator = Arc::new(FixedGenerator::new("fresh"));
    let store = Arc::new(FlakyStore {
        inner: InMemoryHistoryStore::with_texts(texts),
        ..FlakyStore::default()
    });
    let wf = workflow(
        generator.clone(),
        Arc::new(SpyPoster::default()),
        store.clone(),
        PublishSettingsBuilder::default()
            .context_limit(0_usize)
            .build()
            .unwrap(),
    );

    wf.publish_once().await;

    assert_eq!(generator.last_request().context.len(), 25);
    assert_eq!(store.list_all_calls.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Dedup and truncation
// ============================================================================

#[tokio::test]
async fn test_duplicate_never_reaches_poster() {
    let poster = Arc::new(SpyPoster::default());
    let store = Arc::new(InMemoryHistoryStore::with_texts(["Hello world"]));
    let wf = workflow(
        Arc::new(FixedGenerator::new("Hello world")),
        poster.clone(),
        store.clone(),
        PublishSettings::default(),
    );

    let result = wf.publish_once().await;

    assert_eq!(result.status, PublishStatus::Duplicate);
    assert!(result.error_detail.is_none());
    assert!(poster.posted().is_empty());
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_long_text_is_truncated_to_prefix() {
    let generated: String = "abcdefghij".repeat(35);
    assert_eq!(generated.chars().count(), 350);

    let poster = Arc::new(SpyPoster::default());
    let wf = workflow(
        Arc::new(FixedGenerator::new(generated.clone())),
        poster.clone(),
        Arc::new(InMemoryHistoryStore::new()),
        PublishSettings::default(),
    );

    let result = wf.publish_once().await;

    assert_eq!(result.status, PublishStatus::Success);
    let posted = poster.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].chars().count(), 200);
    assert!(generated.starts_with(&posted[0]));
    assert_eq!(result.text.as_deref(), Some(posted[0].as_str()));
}

#[tokio::test]
async fn test_cut_on_whitespace_drops_trailing_space() {
    let prefix = "a".repeat(199);
    let generated = format!("{} {}", prefix, "b".repeat(50));

    let poster = Arc::new(SpyPoster::default());
    let store = Arc::new(InMemoryHistoryStore::new());
    let wf = workflow(
        Arc::new(FixedGenerator::new(generated)),
        poster.clone(),
        store.clone(),
        PublishSettings::default(),
    );

    let result = wf.publish_once().await;

    assert_eq!(result.status, PublishStatus::Success);
    assert_eq!(poster.posted(), vec![prefix.clone()]);
    assert!(store.exists(&prefix).await.unwrap());
}

#[tokio::test]
async fn test_cut_on_whitespace_matches_stored_text() {
    let prefix = "a".repeat(199);
    let generated = format!("{} {}", prefix, "b".repeat(50));

    let poster = Arc::new(SpyPoster::default());
    let wf = workflow(
        Arc::new(FixedGenerator::new(generated)),
        poster.clone(),
        Arc::new(InMemoryHistoryStore::with_texts([prefix.clone()])),
        PublishSettings::default(),
    );

    let result = wf.publish_once().await;

    assert_eq!(result.status, PublishStatus::Duplicate);
    assert!(poster.posted().is_empty());
}

#[tokio::test]
async fn test_truncation_limit_is_configurable() {
    let poster = Arc::new(SpyPoster::default());
    let wf = workflow(
        Arc::new(FixedGenerator::new("  ünïcödé text that is long  ")),
        poster.clone(),
        Arc::new(InMemoryHistoryStore::new()),
        PublishSettingsBuilder::default()
            .max_post_chars(7_usize)
            .build()
            .unwrap(),
    );

    wf.publish_once().await;

    assert_eq!(poster.posted(), vec!["ünïcödé"]);
}

#[tokio::test]
async fn test_empty_text_never_reaches_poster() {
    for generated in ["", "   \n\t "] {
        let poster = Arc::new(SpyPoster::default());
        let store = Arc::new(InMemoryHistoryStore::new());
        let wf = workflow(
            Arc::new(FixedGenerator::new(generated)),
            poster.clone(),
            store.clone(),
            PublishSettings::default(),
        );

        let result = wf.publish_once().await;

        assert_eq!(result.status, PublishStatus::Failure);
        assert!(result.error_detail.unwrap().contains("empty"));
        assert!(poster.posted().is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
    }
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_generator_failure_is_reported() {
    let poster = Arc::new(SpyPoster::default());
    let wf = workflow(
        Arc::new(FailingGenerator),
        poster.clone(),
        Arc::new(InMemoryHistoryStore::new()),
        PublishSettings::default(),
    );

    let result = wf.publish_once().await;

    assert_eq!(result.status, PublishStatus::Failure);
    let detail = result.error_detail.unwrap();
    assert!(detail.starts_with("generation failed"));
    assert!(detail.contains("503"));
    assert!(poster.posted().is_empty());
}

#[tokio::test]
async fn test_poster_failure_leaves_history_unchanged() {
    let store = Arc::new(InMemoryHistoryStore::with_texts(["earlier"]));
    let wf = workflow(
        Arc::new(FixedGenerator::new("Hello world")),
        Arc::new(SpyPoster::failing()),
        store.clone(),
        PublishSettings::default(),
    );

    let result = wf.publish_once().await;

    assert_eq!(result.status, PublishStatus::Failure);
    assert!(result.error_detail.unwrap().starts_with("posting failed"));
    assert_eq!(result.text.as_deref(), Some("Hello world"));
    assert_eq!(store.count().await.unwrap(), 1);
    assert!(!store.exists("Hello world").await.unwrap());
}

#[tokio::test]
async fn test_context_failure_fails_before_generation() {
    let generator = Arc::new(FixedGenerator::new("Hello world"));
    let store = Arc::new(FlakyStore::default());
    store.fail_recent.store(true, Ordering::SeqCst);
    let wf = workflow(
        generator.clone(),
        Arc::new(SpyPoster::default()),
        store,
        PublishSettings::default(),
    );

    let result = wf.publish_once().await;

    assert_eq!(result.status, PublishStatus::Failure);
    assert!(result.error_detail.unwrap().starts_with("history lookup failed"));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_dedup_lookup_failure_does_not_post() {
    let poster = Arc::new(SpyPoster::default());
    let store = Arc::new(FlakyStore::default());
    store.fail_exists.store(true, Ordering::SeqCst);
    let wf = workflow(
        Arc::new(FixedGenerator::new("Hello world")),
        poster.clone(),
        store,
        PublishSettings::default(),
    );

    let result = wf.publish_once().await;

    assert_eq!(result.status, PublishStatus::Failure);
    assert!(poster.posted().is_empty());
}

#[tokio::test]
async fn test_history_write_failure_is_success_with_warning() {
    let poster = Arc::new(SpyPoster::default());
    let store = Arc::new(FlakyStore::default());
    store.fail_insert.store(true, Ordering::SeqCst);
    let wf = workflow(
        Arc::new(FixedGenerator::new("Hello world")),
        poster.clone(),
        store.clone(),
        PublishSettings::default(),
    );

    let result = wf.publish_once().await;

    assert_eq!(result.status, PublishStatus::Success);
    assert!(result.warning.unwrap().contains("history write failed"));
    assert_eq!(poster.posted(), vec!["Hello world"]);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_generator_times_out() {
    let poster = Arc::new(SpyPoster::default());
    let wf = workflow(
        Arc::new(FixedGenerator::slow("late", Duration::from_secs(120))),
        poster.clone(),
        Arc::new(InMemoryHistoryStore::new()),
        PublishSettingsBuilder::default()
            .generator_timeout_secs(5_u64)
            .build()
            .unwrap(),
    );

    let result = wf.publish_once().await;

    assert_eq!(result.status, PublishStatus::Failure);
    assert!(result.error_detail.unwrap().contains("timed out after 5s"));
    assert!(poster.posted().is_empty());
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_attempts_publish_once() {
    let generator = Arc::new(FixedGenerator::slow("Hello world", Duration::from_millis(50)));
    let poster = Arc::new(SpyPoster::default());
    let store = Arc::new(InMemoryHistoryStore::new());
    let wf = Arc::new(workflow(
        generator,
        poster.clone(),
        store.clone(),
        PublishSettings::default(),
    ));

    let attempts = (0..2).map(|_| {
        let wf = Arc::clone(&wf);
        tokio::spawn(async move { wf.publish_once().await })
    });
    let results: Vec<_> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let successes = results.iter().filter(|r| r.is_success()).count();
    let duplicates = results.iter().filter(|r| r.is_duplicate()).count();
    assert_eq!(successes, 1);
    assert_eq!(duplicates, 1);
    assert_eq!(poster.posted().len(), 1);
    assert_eq!(store.count().await.unwrap(), 1);
}
