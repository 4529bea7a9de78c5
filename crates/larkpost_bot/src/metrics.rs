//! Metrics collection for publish attempts.

use larkpost_core::{PublishResult, PublishStatus};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// What started a publish attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// The scheduler fired
    #[display("schedule")]
    Schedule,
    /// `/tweet` or the `publish` command
    #[display("manual")]
    Manual,
}

/// Metrics collector for publish attempts.
#[derive(Debug, Clone)]
pub struct PublishMetrics {
    inner: Arc<PublishMetricsInner>,
}

#[derive(Debug)]
struct PublishMetricsInner {
    // Attempt counts by trigger
    scheduled_attempts: AtomicU64,
    manual_attempts: AtomicU64,

    // Outcome counts
    successes: AtomicU64,
    duplicates: AtomicU64,
    failures: AtomicU64,
    history_warnings: AtomicU64,

    last_success: parking_lot::Mutex<Option<Instant>>,
    last_status: parking_lot::Mutex<Option<PublishStatus>>,
}

impl Default for PublishMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PublishMetrics {
    /// Creates a new metrics collector.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(PublishMetricsInner {
                scheduled_attempts: AtomicU64::new(0),
                manual_attempts: AtomicU64::new(0),
                successes: AtomicU64::new(0),
                duplicates: AtomicU64::new(0),
                failures: AtomicU64::new(0),
                history_warnings: AtomicU64::new(0),
                last_success: parking_lot::Mutex::new(None),
                last_status: parking_lot::Mutex::new(None),
            }),
        }
    }

    /// Records the outcome of one attempt.
    pub fn record(&self, trigger: Trigger, result: &PublishResult) {
        let attempts = match trigger {
            Trigger::Schedule => &self.inner.scheduled_attempts,
            Trigger::Manual => &self.inner.manual_attempts,
        };
        attempts.fetch_add(1, Ordering::Relaxed);

        let outcome = match result.status {
            PublishStatus::Success => &self.inner.successes,
            PublishStatus::Duplicate => &self.inner.duplicates,
            PublishStatus::Failure => &self.inner.failures,
        };
        outcome.fetch_add(1, Ordering::Relaxed);

        if result.warning.is_some() {
            self.inner.history_warnings.fetch_add(1, Ordering::Relaxed);
        }
        if result.is_success() {
            *self.inner.last_success.lock() = Some(Instant::now());
        }
        *self.inner.last_status.lock() = Some(result.status);
    }

    /// Gets total attempt count.
    pub fn attempts(&self) -> u64 {
        self.inner.scheduled_attempts.load(Ordering::Relaxed)
            + self.inner.manual_attempts.load(Ordering::Relaxed)
    }

    /// Gets success count.
    pub fn successes(&self) -> u64 {
        self.inner.successes.load(Ordering::Relaxed)
    }

    /// Gets duplicate count.
    pub fn duplicates(&self) -> u64 {
        self.inner.duplicates.load(Ordering::Relaxed)
    }

    /// Gets failure count.
    pub fn failures(&self) -> u64 {
        self.inner.failures.load(Ordering::Relaxed)
    }

    /// Gets time since last success.
    pub fn time_since_success(&self) -> Option<std::time::Duration> {
        self.inner
            .last_success
            .lock()
            .map(|instant| instant.elapsed())
    }

    /// Share of attempts that did not fail (1.0 before any attempt).
    pub fn success_rate(&self) -> f64 {
        let attempts = self.attempts();
        if attempts == 0 {
            return 1.0;
        }
        attempts.saturating_sub(self.failures()) as f64 / attempts as f64
    }

    /// Creates a serializable snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            attempts: self.attempts(),
            scheduled_attempts: self.inner.scheduled_attempts.load(Ordering::Relaxed),
            manual_attempts: self.inner.manual_attempts.load(Ordering::Relaxed),
            successes: self.successes(),
            duplicates: self.duplicates(),
            failures: self.failures(),
            history_warnings: self.inner.history_warnings.load(Ordering::Relaxed),
            seconds_since_success: self.time_since_success().map(|d| d.as_secs()),
            last_status: *self.inner.last_status.lock(),
            success_rate: self.success_rate(),
        }
    }
}

/// Serializable snapshot of publish metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Attempts from any trigger
    pub attempts: u64,
    /// Attempts started by the scheduler
    pub scheduled_attempts: u64,
    /// Attempts started on demand
    pub manual_attempts: u64,
    /// Attempts that posted
    pub successes: u64,
    /// Attempts stopped by dedup
    pub duplicates: u64,
    /// Attempts that failed
    pub failures: u64,
    /// Successes whose history write failed
    pub history_warnings: u64,
    /// Seconds since last success
    pub seconds_since_success: Option<u64>,
    /// Status of the most recent attempt
    pub last_status: Option<PublishStatus>,
    /// Share of attempts that did not fail
    pub success_rate: f64,
}
