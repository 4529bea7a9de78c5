use crate::api::{ApiState, create_router};
use crate::config::BotConfig;
use crate::keepalive::Keepalive;
use crate::metrics::{PublishMetrics, Trigger};
use crate::schedule::{Schedule, ScheduleType};
use chrono::Utc;
use larkpost_error::{LarkpostResult, ServerError, ServerErrorKind};
use larkpost_publish::PublishWorkflow;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{error, info, instrument};

/// Bot server that runs the scheduler, keep-alive and HTTP API together.
pub struct BotServer {
    config: BotConfig,
    workflow: Arc<PublishWorkflow>,
    metrics: PublishMetrics,
}

impl BotServer {
    /// Creates a new bot server.
    pub fn new(config: BotConfig, workflow: PublishWorkflow) -> Self {
        Self {
            config,
            workflow: Arc::new(workflow),
            metrics: PublishMetrics::new(),
        }
    }

    /// Metrics shared with the HTTP API.
    pub fn metrics(&self) -> &PublishMetrics {
        &self.metrics
    }

    /// Starts the bot server and runs until Ctrl-C.
    pub async fn start(self) -> LarkpostResult<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received");
        })
        .await
    }

    /// Runs the bot server until `shutdown` completes.
    #[instrument(skip(self, shutdown), fields(bind = %self.config.server.bind))]
    pub async fn run_until<F>(self, shutdown: F) -> LarkpostResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting bot server");

        let listener = tokio::net::TcpListener::bind(&self.config.server.bind)
            .await
            .map_err(|e| {
                ServerError::new(ServerErrorKind::Bind {
                    addr: self.config.server.bind.clone(),
                    message: e.to_string(),
                })
            })?;

        let (stop_tx, stop_rx) = watch::channel(false);

        let scheduler = tokio::spawn(run_scheduler(
            self.config.schedule.clone(),
            Arc::clone(&self.workflow),
            self.metrics.clone(),
            stop_rx.clone(),
        ));

        let keepalive = match &self.config.keepalive.url {
            Some(url) => {
                let pinger = Keepalive::new(url.clone(), self.config.keepalive.interval_secs)?;
                Some(tokio::spawn(pinger.run(stop_rx.clone())))
            }
            None => None,
        };

        let router = create_router(ApiState::new(
            Arc::clone(&self.workflow),
            self.metrics.clone(),
        ));

        info!("HTTP server listening");
        let served = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await;

        stop_tx.send_replace(true);
        scheduler
            .await
            .map_err(|e| ServerError::new(ServerErrorKind::Task(e.to_string())))?;
        if let Some(handle) = keepalive {
            handle
                .await
                .map_err(|e| ServerError::new(ServerErrorKind::Task(e.to_string())))?;
        }

        served.map_err(|e| ServerError::new(ServerErrorKind::Serve(e.to_string())))?;
        info!("Bot server stopped");
        Ok(())
    }
}

/// Sleep until each fire time of `schedule` and run one publish attempt.
///
/// Stops when `stop` flips to true or the schedule has no next fire time.
#[instrument(skip_all, fields(schedule = ?schedule))]
pub async fn run_scheduler(
    schedule: ScheduleType,
    workflow: Arc<PublishWorkflow>,
    metrics: PublishMetrics,
    mut stop: watch::Receiver<bool>,
) {
    loop {
        let now = Utc::now();
        let Some(next) = schedule.next_execution(now) else {
            error!(
                "{}",
                ServerErrorKind::ScheduleExhausted("no future fire time".to_string())
            );
            break;
        };
        let wait = (next - now).to_std().unwrap_or_default();
        info!(next_run = %next, wait_secs = wait.as_secs(), "Next publish scheduled");

        tokio::select! {
            _ = sleep(wait) => {}
            _ = stop.changed() => {
                info!("Scheduler stopping");
                break;
            }
        }

        let result = workflow.publish_once().await;
        metrics.record(Trigger::Schedule, &result);
        info!(status = %result.status, "Scheduled publish finished");
    }
}
