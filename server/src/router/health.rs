use aide::{
    axum::{routing::get_with, ApiRouter, IntoApiResponse},
    transform::TransformOperation,
};
use axum::{extract::State, Json};
use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Seconds since the server started.
    pub uptime: u64,
    /// Current server time, milliseconds since the Unix epoch.
    pub timestamp: i64,
}

pub fn health_routes(_app_state: AppState) -> ApiRouter<AppState> {
    ApiRouter::new()
        .api_route("/", get_with(hello, hello_docs))
        .api_route("/health", get_with(health, health_docs))
}

pub async fn hello() -> impl IntoApiResponse {
    "Hello World!"
}

fn hello_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Greeting")
        .description("Friendly greeting from the service root")
        .tag("App-Root")
        .response::<200, String>()
}

pub async fn health(State(state): State<AppState>) -> impl IntoApiResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now().timestamp_millis(),
    })
}

fn health_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Health check")
        .description("Service status, uptime and current timestamp")
        .tag("App-Root")
        .response::<200, Json<HealthResponse>>()
}
