//! Outcome of a single publish attempt.

use serde::{Deserialize, Serialize};

/// Terminal status of a publish attempt.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    /// Text was posted
    #[display("success")]
    Success,
    /// Generated text was already in history; nothing was posted
    #[display("duplicate")]
    Duplicate,
    /// A step failed; nothing was recorded
    #[display("failure")]
    Failure,
}

/// Result of one publish attempt.
///
/// Failures are values, not errors: every step error is folded into a
/// `PublishResult` so callers only ever inspect [`PublishResult::status`].
///
/// # Examples
///
/// ```
/// use larkpost_core::{PublishResult, PublishStatus};
///
/// let result = PublishResult::success("Hello world", Some("1850".into()));
/// assert_eq!(result.status, PublishStatus::Success);
/// assert_eq!(result.text.as_deref(), Some("Hello world"));
/// assert!(result.error_detail.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    /// Terminal status
    pub status: PublishStatus,
    /// Candidate or published text, when one was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Failure detail; only set when `status` is `Failure`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    /// Prompt category used for the attempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Platform identifier of the post
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    /// Set when the post went out but history bookkeeping failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl PublishResult {
    /// The text was posted.
    pub fn success(text: impl Into<String>, post_id: Option<String>) -> Self {
        Self {
            status: PublishStatus::Success,
            text: Some(text.into()),
            error_detail: None,
            category: None,
            post_id,
            warning: None,
        }
    }

    /// The text matched an existing history entry.
    pub fn duplicate(text: impl Into<String>) -> Self {
        Self {
            status: PublishStatus::Duplicate,
            text: Some(text.into()),
            error_detail: None,
            category: None,
            post_id: None,
            warning: None,
        }
    }

    /// A step failed.
    pub fn failure(detail: impl Into<String>) -> Self {
        Self {
            status: PublishStatus::Failure,
            text: None,
            error_detail: Some(detail.into()),
            category: None,
            post_id: None,
            warning: None,
        }
    }

    /// Attach the candidate text to a failure.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Attach the prompt category name.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Attach a bookkeeping warning.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    /// Whether the text was posted.
    pub fn is_success(&self) -> bool {
        self.status == PublishStatus::Success
    }

    /// Whether the attempt stopped on a duplicate.
    pub fn is_duplicate(&self) -> bool {
        self.status == PublishStatus::Duplicate
    }

    /// Whether the attempt failed.
    pub fn is_failure(&self) -> bool {
        self.status == PublishStatus::Failure
    }
}
