//! Request sent to a content generator.

use serde::{Deserialize, Serialize};

/// Prompt plus previously published texts, oldest first.
///
/// # Examples
///
/// ```
/// use larkpost_core::GenerationRequest;
///
/// let request = GenerationRequest::new("Share a tech tip")
///     .with_context(vec!["Use git bisect.".to_string()]);
/// assert_eq!(request.context.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GenerationRequest {
    /// Prompt text
    pub prompt: String,
    /// Prior posts used as conversational context
    pub context: Vec<String>,
}

impl GenerationRequest {
    /// Create a request with no context.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            context: Vec::new(),
        }
    }

    /// Replace the context.
    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = context;
        self
    }
}
