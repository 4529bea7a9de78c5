//! Scheduler and HTTP shell for the larkpost posting bot.
//!
//! This crate wires the publish workflow to its triggers:
//! - **Scheduler**: fires daily (or on a cron/interval) in a configured timezone
//! - **HTTP API**: liveness, health, metrics and the manual `/tweet` trigger
//! - **Keep-alive**: periodic self-ping for hosts that idle inactive services
//!
//! Configuration is loaded once by [`BotConfig::load`] and secrets once by
//! [`Credentials::from_env`]; both are passed into constructors explicitly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod components;
mod config;
mod keepalive;
mod metrics;
mod schedule;
mod server;

pub use api::{ALIVE_MESSAGE, ApiState, create_router, publish_response};
pub use components::{build_generator, build_poster, build_store, build_workflow};
pub use config::{
    BotConfig, Credentials, DEFAULT_CONFIG, GeneratorSettings, KeepaliveSettings, PosterSettings,
    PromptEntry, ServerSettings, StoreBackend, StoreSettings,
};
pub use keepalive::Keepalive;
pub use metrics::{MetricsSnapshot, PublishMetrics, Trigger};
pub use schedule::{MAX_INTERVAL_SECS, Schedule, ScheduleType};
pub use server::{BotServer, run_scheduler};
