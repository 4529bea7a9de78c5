//! Periodic self-ping so hosting platforms do not idle the service.

use larkpost_error::HttpError;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Pings a URL on an interval.
#[derive(Debug, Clone)]
pub struct Keepalive {
    url: String,
    interval: Duration,
    client: reqwest::Client,
}

impl Keepalive {
    /// Create a pinger for `url` every `interval_secs` seconds.
    ///
    /// # Errors
    ///
    /// Returns an [`HttpError`] if `interval_secs` is zero or the client cannot be built.
    pub fn new(url: impl Into<String>, interval_secs: u64) -> Result<Self, HttpError> {
        if interval_secs == 0 {
            return Err(HttpError::new("keep-alive interval must be positive"));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| HttpError::new(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            interval: Duration::from_secs(interval_secs),
            client,
        })
    }

    /// The URL being pinged.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one ping, returning the HTTP status code.
    ///
    /// # Errors
    ///
    /// Returns an [`HttpError`] if the request fails or the status is not 2xx.
    pub async fn ping(&self) -> Result<u16, HttpError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("keep-alive request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::new(format!(
                "keep-alive got HTTP {}",
                status.as_u16()
            )));
        }
        Ok(status.as_u16())
    }

    /// Ping until `shutdown` flips to true. Failures are logged, never fatal.
    #[instrument(skip(self, shutdown), fields(url = %self.url, interval_secs = self.interval.as_secs()))]
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("Keep-alive started");
        let mut ticker = tokio::time::interval(self.interval);
        // The first tick completes immediately; the service was just started.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => match self.ping().await {
                    Ok(status) => debug!(status, "Keep-alive ping ok"),
                    Err(e) => warn!(error = %e.message, "Keep-alive ping failed"),
                },
                _ = shutdown.changed() => {
                    info!("Keep-alive stopping");
                    break;
                }
            }
        }
    }
}
