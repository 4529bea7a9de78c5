//! HTTP trigger surface.
//!
//! - `GET /`: liveness acknowledgement
//! - `GET /health`: JSON health check
//! - `GET|POST /tweet`: run one publish attempt
//! - `GET /metrics`: publish metrics snapshot

use crate::metrics::{PublishMetrics, Trigger};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use larkpost_core::{PublishResult, PublishStatus};
use larkpost_publish::PublishWorkflow;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, instrument};

/// Body of `GET /`.
pub const ALIVE_MESSAGE: &str = "I'm alive";

/// API state shared by the handlers.
#[derive(Clone)]
pub struct ApiState {
    workflow: Arc<PublishWorkflow>,
    metrics: PublishMetrics,
}

impl ApiState {
    /// Creates new API state.
    pub fn new(workflow: Arc<PublishWorkflow>, metrics: PublishMetrics) -> Self {
        Self { workflow, metrics }
    }
}

/// Creates the API router.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(alive))
        .route("/health", get(health_check))
        .route("/tweet", get(trigger_publish).post(trigger_publish))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}

/// Map a publish result to an HTTP status and JSON body.
///
/// success → 200, duplicate → 409, failure → 500.
pub fn publish_response(result: &PublishResult) -> (StatusCode, Value) {
    let (status, mut body) = match result.status {
        PublishStatus::Success => (
            StatusCode::OK,
            json!({
                "status": "success",
                "tweet": result.text,
                "post_id": result.post_id,
            }),
        ),
        PublishStatus::Duplicate => (
            StatusCode::CONFLICT,
            json!({
                "status": "duplicate",
                "message": "Generated text was already published; nothing posted",
                "tweet": result.text,
            }),
        ),
        PublishStatus::Failure => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "status": "failure",
                "message": result.error_detail.as_deref().unwrap_or("publish failed"),
            }),
        ),
    };

    if let (Some(warning), Some(map)) = (&result.warning, body.as_object_mut()) {
        map.insert("warning".to_string(), Value::String(warning.clone()));
    }
    if let (Some(category), Some(map)) = (&result.category, body.as_object_mut()) {
        map.insert("category".to_string(), Value::String(category.clone()));
    }

    (status, body)
}

async fn alive() -> &'static str {
    ALIVE_MESSAGE
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// Run one publish attempt on demand.
#[instrument(skip(state))]
async fn trigger_publish(State(state): State<ApiState>) -> impl IntoResponse {
    info!("Manual publish requested");
    let result = state.workflow.publish_once().await;
    state.metrics.record(Trigger::Manual, &result);

    let (status, body) = publish_response(&result);
    (status, Json(body))
}

/// Get current metrics snapshot.
async fn get_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let snapshot = state.metrics.snapshot();
    (StatusCode::OK, Json(snapshot))
}
