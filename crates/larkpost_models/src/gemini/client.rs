//! Gemini REST client implementing [`ContentGenerator`].

use super::config::GeminiConfig;
use super::dto::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use async_trait::async_trait;
use larkpost_core::GenerationRequest;
use larkpost_error::{GeneratorError, GeneratorErrorKind};
use larkpost_interface::ContentGenerator;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// Acknowledgement turn inserted after the context listing so roles alternate.
const CONTEXT_ACK: &str = "Understood. I will write something new that does not repeat any of those posts.";

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot be
    /// built.
    #[instrument(skip(config), fields(model = %config.model(), base_url = %config.base_url()))]
    pub fn new(config: GeminiConfig) -> Result<Self, GeneratorError> {
        if config.api_key().trim().is_empty() {
            return Err(GeneratorError::new(GeneratorErrorKind::MissingApiKey));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()
            .map_err(|e| GeneratorError::new(GeneratorErrorKind::Request(e.to_string())))?;

        debug!("Creating Gemini client");
        Ok(Self { config, client })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url().trim_end_matches('/'),
            self.config.model_path()
        )
    }

    fn build_body(&self, request: &GenerationRequest) -> GenerateContentRequest {
        let mut contents = Vec::with_capacity(3);

        if !request.context.is_empty() {
            let mut listing =
                String::from("These are posts you have already published, oldest first:\n");
            for (i, text) in request.context.iter().enumerate() {
                listing.push_str(&format!("{}. {}\n", i + 1, text));
            }
            listing.push_str("Do not repeat any of them.");

            contents.push(Content::text("user", listing));
            contents.push(Content::text("model", CONTEXT_ACK));
        }

        contents.push(Content::text("user", request.prompt.clone()));

        let generation_config = match (
            *self.config.temperature(),
            *self.config.max_output_tokens(),
        ) {
            (None, None) => None,
            (temperature, max_output_tokens) => Some(GenerationConfig {
                temperature,
                max_output_tokens,
            }),
        };

        GenerateContentRequest {
            contents,
            generation_config,
        }
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String, GeneratorError> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(GeneratorError::new(GeneratorErrorKind::Blocked(reason)));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GeneratorError::new(GeneratorErrorKind::EmptyContent))?;

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        if let Some(reason) = candidate.finish_reason {
            warn!(finish_reason = %reason, "Candidate finished without text");
        }
        return Err(GeneratorError::new(GeneratorErrorKind::EmptyContent));
    }

    Ok(text)
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    #[instrument(skip(self, request), fields(model = %self.config.model(), context_len = request.context.len()))]
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError> {
        let url = self.endpoint();
        debug!("Sending generateContent request to {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key())])
            .json(&self.build_body(request))
            .send()
            .await
            .map_err(|e| {
                error!("Request failed: {}", e);
                GeneratorError::new(GeneratorErrorKind::Request(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Gemini returned error");
            return Err(GeneratorError::new(GeneratorErrorKind::HttpStatus {
                status_code: status.as_u16(),
                message,
            }));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            error!("Failed to parse response: {}", e);
            GeneratorError::new(GeneratorErrorKind::Malformed(e.to_string()))
        })?;

        let text = extract_text(body)?;
        debug!(text_len = text.chars().count(), "Generation successful");
        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        self.config.model()
    }
}
