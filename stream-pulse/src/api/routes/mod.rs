//! API route definitions.

pub mod analytics;
pub mod auth;
pub mod logging;
pub mod monitor;
pub mod status;
pub mod user;

use axum::{Router, middleware};

use crate::api::middleware::require_admin;
use crate::api::server::AppState;

/// Create the main API router with all routes.
pub fn create_router(state: AppState) -> Router {
    let admin = Router::new()
        .nest("/api/monitor", monitor::router())
        .nest("/api/logging", logging::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .merge(status::router())
        .merge(user::router())
        .nest("/auth", auth::router())
        .nest("/api/analytics", analytics::router())
        .merge(admin)
        .with_state(state)
}
