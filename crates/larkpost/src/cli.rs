//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Larkpost - scheduled LLM-generated posts to X with history-based deduplication
#[derive(Parser, Debug)]
#[command(name = "larkpost")]
#[command(about = "Scheduled LLM-generated posts to X with history-based deduplication", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file layered over the bundled defaults
    #[arg(short, long, global = true, env = "LARKPOST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scheduler, keep-alive and HTTP API until interrupted
    Serve,

    /// Run one publish attempt and print the result as JSON
    ///
    /// Exits 0 on success or duplicate, 1 on failure.
    Publish,

    /// Show previously published posts, oldest first
    History {
        /// Number of most recent entries to show (0 for all)
        #[arg(long, default_value = "20")]
        limit: usize,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the configured prompt categories
    Prompts,

    /// Validate configuration and credentials, then print a summary
    CheckConfig,
}
