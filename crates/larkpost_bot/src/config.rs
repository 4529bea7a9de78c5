//! Bot configuration.
//!
//! The configuration system supports:
//! - Bundled defaults (include_str! from larkpost.toml)
//! - A user file (`--config <path>` or ./larkpost.toml)
//! - Environment overrides (`LARKPOST__SECTION__KEY`)
//!
//! Secrets are kept out of the layered config and read once into
//! [`Credentials`].

use crate::schedule::ScheduleType;
use config::{Config, Environment, File, FileFormat};
use larkpost_core::{PromptCategory, PromptSet};
use larkpost_error::{ConfigError, LarkpostError, LarkpostResult};
use larkpost_publish::PublishSettings;
use larkpost_social::OAuthCredentials;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Bundled default configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../../../larkpost.toml");

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Listen address, e.g. "0.0.0.0:8080"
    pub bind: String,
}

/// Content generator settings (the API key lives in [`Credentials`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Gemini model identifier
    pub model: String,
    /// Gemini REST base URL
    pub base_url: String,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Maximum output tokens
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

/// Poster settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterSettings {
    /// Log posts instead of publishing them
    #[serde(default)]
    pub dry_run: bool,
    /// X API base URL
    pub base_url: String,
    /// Platform text limit in characters
    pub max_chars: usize,
}

/// History store backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// PostgreSQL via diesel
    Postgres,
    /// Process memory; history is lost on restart
    Memory,
}

/// History store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Which backend to use
    pub backend: StoreBackend,
    /// Connection string; falls back to `DATABASE_URL`
    #[serde(default)]
    pub database_url: Option<String>,
    /// Maximum pooled connections
    pub pool_size: u32,
}

/// Self-ping settings for hosts that idle inactive services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeepaliveSettings {
    /// URL to GET; keep-alive is off when unset
    #[serde(default)]
    pub url: Option<String>,
    /// Seconds between pings
    pub interval_secs: u64,
}

/// A prompt entry as written in TOML or JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptEntry {
    /// Prompt text
    pub description: String,
}

/// Configuration for the bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    /// HTTP listener
    pub server: ServerSettings,
    /// Publish schedule
    #[serde(default)]
    pub schedule: ScheduleType,
    /// Publish workflow limits and timeouts
    #[serde(default)]
    pub publish: PublishSettings,
    /// Content generator
    pub generator: GeneratorSettings,
    /// Poster
    pub poster: PosterSettings,
    /// History store
    pub store: StoreSettings,
    /// Keep-alive pings
    pub keepalive: KeepaliveSettings,
    /// JSON prompt file
    #[serde(default)]
    pub prompts_file: Option<PathBuf>,
    /// Inline prompt categories; these override file entries with the same name
    #[serde(default)]
    pub prompts: BTreeMap<String, PromptEntry>,
}

fn config_error(context: &str, e: impl fmt::Display) -> LarkpostError {
    LarkpostError::from(ConfigError::new(format!("{}: {}", context, e)))
}

impl BotConfig {
    /// Load configuration with precedence: environment > user file > bundled defaults.
    ///
    /// With `path = None`, `./larkpost.toml` is used when present.
    #[instrument]
    pub fn load(path: Option<&Path>) -> LarkpostResult<Self> {
        debug!("Loading configuration");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("larkpost").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("LARKPOST")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .map_err(|e| config_error("Failed to build configuration", e))?
            .try_deserialize()
            .map_err(|e| config_error("Failed to parse configuration", e))?;

        config.schedule.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string layered over the bundled defaults.
    pub fn from_toml_str(toml: &str) -> LarkpostResult<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .map_err(|e| config_error("Failed to build configuration", e))?
            .try_deserialize()
            .map_err(|e| config_error("Failed to parse configuration", e))?;

        config.schedule.validate()?;
        Ok(config)
    }

    /// Resolve the prompt set from `prompts_file` and inline `prompts`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or if
    /// the resulting set is empty.
    #[instrument(skip(self), fields(prompts_file = ?self.prompts_file))]
    pub fn prompt_set(&self) -> LarkpostResult<PromptSet> {
        let mut categories: Vec<PromptCategory> = Vec::new();

        if let Some(path) = self
            .prompts_file
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty())
        {
            let json = std::fs::read_to_string(path).map_err(|e| {
                config_error(&format!("Failed to read prompts file {}", path.display()), e)
            })?;
            categories.extend(PromptSet::from_json(&json)?.iter().cloned());
        }

        categories.extend(
            self.prompts
                .iter()
                .map(|(name, entry)| PromptCategory::new(name.clone(), entry.description.clone())),
        );

        let set = PromptSet::new(categories)?;
        debug!(count = set.len(), "Loaded prompt categories");
        Ok(set)
    }

    /// Connection string from config or the credentials' `DATABASE_URL`.
    pub fn database_url<'a>(&'a self, credentials: &'a Credentials) -> Option<&'a str> {
        self.store
            .database_url
            .as_deref()
            .or(credentials.database_url.as_deref())
            .filter(|url| !url.trim().is_empty())
    }

    /// Startup checks that need both config and credentials.
    pub fn validate(&self, credentials: &Credentials) -> LarkpostResult<()> {
        self.schedule.validate()?;
        self.prompt_set()?;

        if *self.publish.max_post_chars() == 0 {
            return Err(ConfigError::new("publish.max_post_chars must be positive").into());
        }
        if *self.publish.max_post_chars() > self.poster.max_chars {
            return Err(ConfigError::new(format!(
                "publish.max_post_chars ({}) exceeds poster.max_chars ({})",
                self.publish.max_post_chars(),
                self.poster.max_chars
            ))
            .into());
        }

        if credentials.gemini_api_key.trim().is_empty() {
            return Err(ConfigError::new("GEMINI_API_KEY is not set").into());
        }

        if !self.poster.dry_run {
            let missing = credentials.oauth().missing();
            if !missing.is_empty() {
                return Err(ConfigError::new(format!(
                    "Missing X credentials: {} (set CONSUMER_KEY, CONSUMER_SECRET, ACCESS_KEY, ACCESS_SECRET or enable poster.dry_run)",
                    missing.join(", ")
                ))
                .into());
            }
        }

        if self.store.backend == StoreBackend::Postgres && self.database_url(credentials).is_none()
        {
            return Err(ConfigError::new(
                "store.backend is postgres but no database URL is configured (set DATABASE_URL)",
            )
            .into());
        }

        if self.keepalive.url.is_some() && self.keepalive.interval_secs == 0 {
            return Err(ConfigError::new("keepalive.interval_secs must be positive").into());
        }

        Ok(())
    }
}

/// Secrets read from the environment.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Gemini API key (`GEMINI_API_KEY`)
    pub gemini_api_key: String,
    /// X consumer key (`CONSUMER_KEY`)
    pub consumer_key: String,
    /// X consumer secret (`CONSUMER_SECRET`)
    pub consumer_secret: String,
    /// X access token (`ACCESS_KEY`)
    pub access_key: String,
    /// X access token secret (`ACCESS_SECRET`)
    pub access_secret: String,
    /// PostgreSQL connection string (`DATABASE_URL`)
    pub database_url: Option<String>,
}

impl Credentials {
    /// Read credentials from the process environment.
    ///
    /// Missing variables become empty strings; [`BotConfig::validate`]
    /// reports them.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).unwrap_or_default();
        Self {
            gemini_api_key: var("GEMINI_API_KEY"),
            consumer_key: var("CONSUMER_KEY"),
            consumer_secret: var("CONSUMER_SECRET"),
            access_key: var("ACCESS_KEY"),
            access_secret: var("ACCESS_SECRET"),
            database_url: std::env::var("DATABASE_URL").ok(),
        }
    }

    /// OAuth 1.0a credentials for the X poster.
    pub fn oauth(&self) -> OAuthCredentials {
        OAuthCredentials::new(
            self.consumer_key.clone(),
            self.consumer_secret.clone(),
            self.access_key.clone(),
            self.access_secret.clone(),
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &str| if value.is_empty() { "<unset>" } else { "[REDACTED]" };
        f.debug_struct("Credentials")
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("consumer_key", &redact(&self.consumer_key))
            .field("consumer_secret", &redact(&self.consumer_secret))
            .field("access_key", &redact(&self.access_key))
            .field("access_secret", &redact(&self.access_secret))
            .field(
                "database_url",
                &redact(self.database_url.as_deref().unwrap_or_default()),
            )
            .finish()
    }
}
