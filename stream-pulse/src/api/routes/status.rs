//! Liveness and overview routes.

use axum::{Json, Router, extract::State, routing::get};

use crate::api::models::{HealthResponse, StatusResponse};
use crate::api::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(status))
        .route("/health", get(health_check))
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running",
        active_channels: state.analytics.active_channels(),
        total_users: state.credential_store().len(),
        monitored_channels: state.scheduler.channel_ids().len(),
    })
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
