//! Gemini client configuration.

use derive_builder::Builder;
use derive_getters::Getters;

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";

/// Configuration for [`GeminiClient`](crate::GeminiClient).
///
/// # Examples
///
/// ```
/// use larkpost_models::GeminiConfigBuilder;
///
/// let config = GeminiConfigBuilder::default()
///     .api_key("secret")
///     .temperature(0.9_f32)
///     .build()
///     .unwrap();
/// assert_eq!(config.model(), "gemini-1.5-flash-latest");
/// assert_eq!(*config.timeout_secs(), 60);
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Getters)]
#[builder(setter(into))]
pub struct GeminiConfig {
    /// API key sent as the `key` query parameter
    api_key: String,
    /// Model identifier
    #[builder(default = "DEFAULT_GEMINI_MODEL.to_string()")]
    model: String,
    /// Base URL (overridden in tests)
    #[builder(default = "DEFAULT_GEMINI_BASE_URL.to_string()")]
    base_url: String,
    /// Sampling temperature
    #[builder(default, setter(strip_option))]
    temperature: Option<f32>,
    /// Maximum output tokens
    #[builder(default, setter(strip_option))]
    max_output_tokens: Option<u32>,
    /// Per-request timeout in seconds
    #[builder(default = "60")]
    timeout_secs: u64,
}

impl GeminiConfig {
    /// Model name without a leading `models/` prefix.
    pub fn model_path(&self) -> &str {
        self.model.strip_prefix("models/").unwrap_or(&self.model)
    }
}
