//! Build the workflow's collaborators from configuration.

use crate::config::{BotConfig, Credentials, StoreBackend};
use larkpost_database::PostgresHistoryStore;
use larkpost_error::{ConfigError, LarkpostResult};
use larkpost_interface::{ContentGenerator, HistoryStore, Poster};
use larkpost_models::{GeminiClient, GeminiConfigBuilder};
use larkpost_publish::{InMemoryHistoryStore, PublishWorkflow};
use larkpost_social::{NoOpPoster, XClient, XConfigBuilder};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Gemini client from `[generator]` and `GEMINI_API_KEY`.
pub fn build_generator(
    config: &BotConfig,
    credentials: &Credentials,
) -> LarkpostResult<Arc<dyn ContentGenerator>> {
    let settings = &config.generator;
    let mut builder = GeminiConfigBuilder::default();
    builder
        .api_key(credentials.gemini_api_key.clone())
        .model(settings.model.clone())
        .base_url(settings.base_url.clone())
        .timeout_secs(*config.publish.generator_timeout_secs());
    if let Some(temperature) = settings.temperature {
        builder.temperature(temperature);
    }
    if let Some(max_output_tokens) = settings.max_output_tokens {
        builder.max_output_tokens(max_output_tokens);
    }

    let gemini_config = builder
        .build()
        .map_err(|e| ConfigError::new(format!("Invalid generator configuration: {}", e)))?;
    Ok(Arc::new(GeminiClient::new(gemini_config)?))
}

/// X client, or a [`NoOpPoster`] when `poster.dry_run` is set.
pub fn build_poster(
    config: &BotConfig,
    credentials: &Credentials,
) -> LarkpostResult<Arc<dyn Poster>> {
    if config.poster.dry_run {
        warn!("poster.dry_run is set; posts will be logged, not published");
        return Ok(Arc::new(NoOpPoster::new()));
    }

    let x_config = XConfigBuilder::default()
        .credentials(credentials.oauth())
        .base_url(config.poster.base_url.clone())
        .max_chars(config.poster.max_chars)
        .timeout_secs(*config.publish.poster_timeout_secs())
        .build()
        .map_err(|e| ConfigError::new(format!("Invalid poster configuration: {}", e)))?;
    Ok(Arc::new(XClient::new(x_config)?))
}

/// History store selected by `store.backend`.
#[instrument(skip_all, fields(backend = ?config.store.backend))]
pub async fn build_store(
    config: &BotConfig,
    credentials: &Credentials,
) -> LarkpostResult<Arc<dyn HistoryStore>> {
    match config.store.backend {
        StoreBackend::Postgres => {
            let url = config.database_url(credentials).ok_or_else(|| {
                ConfigError::new("store.backend is postgres but no database URL is configured")
            })?;
            let store = PostgresHistoryStore::connect(url, config.store.pool_size).await?;
            info!("Connected to PostgreSQL history store");
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory history store; history is lost on restart");
            Ok(Arc::new(InMemoryHistoryStore::new()))
        }
    }
}

/// Assemble the publish workflow.
pub async fn build_workflow(
    config: &BotConfig,
    credentials: &Credentials,
) -> LarkpostResult<PublishWorkflow> {
    let prompts = config.prompt_set()?;
    let generator = build_generator(config, credentials)?;
    let poster = build_poster(config, credentials)?;
    let store = build_store(config, credentials).await?;

    info!(
        prompts = prompts.len(),
        model = generator.model_name(),
        platform = poster.platform_name(),
        "Publish workflow ready"
    );
    Ok(PublishWorkflow::new(
        prompts,
        generator,
        poster,
        store,
        config.publish.clone(),
    ))
}
