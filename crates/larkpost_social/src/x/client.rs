//! X API v2 client implementing [`Poster`].

use super::dto::{CreateTweetRequest, CreateTweetResponse};
use super::oauth::{OAuthCredentials, authorization_header};
use async_trait::async_trait;
use derive_builder::Builder;
use derive_getters::Getters;
use larkpost_error::{PosterError, PosterErrorKind};
use larkpost_interface::{PostId, Poster};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Default X API base URL.
pub const DEFAULT_X_BASE_URL: &str = "https://api.twitter.com";

/// Configuration for [`XClient`].
///
/// # Examples
///
/// ```
/// use larkpost_social::{OAuthCredentials, XConfigBuilder};
///
/// let config = XConfigBuilder::default()
///     .credentials(OAuthCredentials::new("ck", "cs", "at", "as"))
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url(), "https://api.twitter.com");
/// assert_eq!(*config.max_chars(), 280);
/// ```
#[derive(Debug, Clone, Builder, Getters)]
#[builder(setter(into))]
pub struct XConfig {
    /// OAuth 1.0a user-context credentials
    credentials: OAuthCredentials,
    /// Base URL (overridden in tests)
    #[builder(default = "DEFAULT_X_BASE_URL.to_string()")]
    base_url: String,
    /// Platform text limit in characters
    #[builder(default = "280")]
    max_chars: usize,
    /// Per-request timeout in seconds
    #[builder(default = "30")]
    timeout_secs: u64,
}

/// Client for `POST /2/tweets`.
#[derive(Debug, Clone)]
pub struct XClient {
    config: XConfig,
    client: reqwest::Client,
}

impl XClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`PosterErrorKind::Unauthorized`] if any credential is blank,
    /// or a request error if the HTTP client cannot be built.
    #[instrument(skip(config), fields(base_url = %config.base_url()))]
    pub fn new(config: XConfig) -> Result<Self, PosterError> {
        let missing = config.credentials().missing();
        if !missing.is_empty() {
            return Err(PosterError::new(PosterErrorKind::Unauthorized(format!(
                "missing credentials: {}",
                missing.join(", ")
            ))));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()
            .map_err(|e| PosterError::new(PosterErrorKind::Request(e.to_string())))?;

        debug!("Creating X client");
        Ok(Self { config, client })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &XConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/2/tweets", self.config.base_url().trim_end_matches('/'))
    }
}

fn status_error(status: StatusCode, message: String) -> PosterError {
    let kind = match status {
        StatusCode::UNAUTHORIZED => PosterErrorKind::Unauthorized(message),
        StatusCode::TOO_MANY_REQUESTS => PosterErrorKind::RateLimited(message),
        _ => PosterErrorKind::Rejected {
            status_code: status.as_u16(),
            message,
        },
    };
    PosterError::new(kind)
}

#[async_trait]
impl Poster for XClient {
    #[instrument(skip(self, text), fields(text_len = text.chars().count()))]
    async fn post(&self, text: &str) -> Result<PostId, PosterError> {
        let length = text.chars().count();
        if length > *self.config.max_chars() {
            return Err(PosterError::new(PosterErrorKind::TooLong {
                length,
                limit: *self.config.max_chars(),
            }));
        }

        let url = self.endpoint();
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = chrono::Utc::now().timestamp();
        let authorization =
            authorization_header(self.config.credentials(), "POST", &url, &[], &nonce, timestamp)?;

        debug!("Sending create tweet request to {}", url);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .json(&CreateTweetRequest { text })
            .send()
            .await
            .map_err(|e| {
                error!("Request failed: {}", e);
                PosterError::new(PosterErrorKind::Request(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "X API returned error");
            return Err(status_error(status, message));
        }

        let body: CreateTweetResponse = response.json().await.map_err(|e| {
            error!("Failed to decode create tweet response: {}", e);
            PosterError::new(PosterErrorKind::Malformed(e.to_string()))
        })?;

        info!(post_id = %body.data.id, "Post published");
        Ok(PostId(body.data.id))
    }

    fn platform_name(&self) -> &str {
        "x"
    }
}
