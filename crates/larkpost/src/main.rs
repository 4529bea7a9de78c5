//! Larkpost CLI binary.
//!
//! This binary provides command-line access to the posting bot:
//! - Run the scheduler and HTTP trigger surface
//! - Publish once on demand
//! - Inspect history, prompts and configuration

use clap::Parser;
use larkpost_bot::{BotConfig, BotServer, Credentials, build_store, build_workflow, publish_response};
use larkpost_interface::HistoryStore;
use std::process::ExitCode;
use tracing::{info, warn};

mod cli;
#[cfg(not(feature = "observability"))]
mod logging;
#[cfg(feature = "observability")]
mod observability;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Missing .env is fine; credentials may come from the real environment.
    match dotenvy::dotenv() {
        Err(e) if !e.not_found() => eprintln!("Failed to load .env: {}", e),
        _ => {}
    }

    #[cfg(feature = "observability")]
    let provider = observability::init_observability(cli.verbose, cli.json_logs)?;
    #[cfg(not(feature = "observability"))]
    logging::init_logging(cli.verbose, cli.json_logs)?;

    let outcome = run(cli).await;

    // Flush spans whether or not the command succeeded.
    #[cfg(feature = "observability")]
    observability::shutdown_observability(provider);

    outcome
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = BotConfig::load(cli.config.as_deref())?;
    let credentials = Credentials::from_env();

    let code = match cli.command {
        Commands::Serve => {
            config.validate(&credentials)?;
            let workflow = build_workflow(&config, &credentials).await?;
            BotServer::new(config, workflow).start().await?;
            ExitCode::SUCCESS
        }

        Commands::Publish => {
            config.validate(&credentials)?;
            let workflow = build_workflow(&config, &credentials).await?;
            let result = workflow.publish_once().await;
            let (status, body) = publish_response(&result);
            println!("{}", serde_json::to_string_pretty(&body)?);
            info!(http_status = status.as_u16(), "Publish attempt complete");
            if result.is_failure() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }

        Commands::History { limit, json } => {
            let store = build_store(&config, &credentials).await?;
            let entries = if limit == 0 {
                store.list_all().await?
            } else {
                store.recent(limit).await?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No posts recorded yet.");
            } else {
                for entry in &entries {
                    println!(
                        "{}  {:<20}  {}",
                        entry.posted_at().format("%Y-%m-%d %H:%M:%S"),
                        entry.post_id().as_deref().unwrap_or("-"),
                        entry.text()
                    );
                }
            }
            ExitCode::SUCCESS
        }

        Commands::Prompts => {
            let prompts = config.prompt_set()?;
            for category in prompts.iter() {
                println!("{}: {}", category.name(), category.description());
            }
            ExitCode::SUCCESS
        }

        Commands::CheckConfig => match config.validate(&credentials) {
            Ok(()) => {
                println!("Configuration OK");
                println!("  schedule:  {:?}", config.schedule);
                println!("  bind:      {}", config.server.bind);
                println!("  prompts:   {}", config.prompt_set()?.len());
                println!("  model:     {}", config.generator.model);
                println!("  dry run:   {}", config.poster.dry_run);
                println!("  store:     {:?}", config.store.backend);
                println!(
                    "  keepalive: {}",
                    config.keepalive.url.as_deref().unwrap_or("off")
                );
                println!("  credentials: {:?}", credentials);
                ExitCode::SUCCESS
            }
            Err(e) => {
                warn!("Configuration check failed");
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },
    };

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_returns_config_error_to_caller() {
        let cli = Cli::try_parse_from([
            "larkpost",
            "--config",
            "/nonexistent/larkpost-missing.toml",
            "serve",
        ])
        .unwrap();

        assert!(run(cli).await.is_err());
    }
}
