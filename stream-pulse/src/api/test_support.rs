//! Mock Twitch upstream and application state for route tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use helix_client::http::build_client;
use helix_client::{HelixClient, OAuthClient};
use serde_json::json;
use tokio::net::TcpListener;

use crate::analytics::AnalyticsReader;
use crate::api::server::AppState;
use crate::credentials::{CredentialRefreshService, CredentialStore};
use crate::monitor::{HelixPlatform, MonitorContext, MonitorEventBroadcaster};
use crate::scheduler::{Scheduler, SchedulerConfig};
use crate::store::SessionStore;

pub(crate) const GOOD_TOKEN: &str = "good-token";
pub(crate) const USER_ID: &str = "1001";
pub(crate) const BACKEND_URL: &str = "http://localhost:3000";
pub(crate) const ADMIN_TOKEN: &str = "admin-secret";

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

async fn users(headers: HeaderMap) -> Response {
    if bearer(&headers) != Some(GOOD_TOKEN) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"status": 401, "message": "Invalid OAuth token"})),
        )
            .into_response();
    }
    Json(json!({
        "data": [{
            "id": USER_ID,
            "login": "streamer",
            "display_name": "Streamer",
            "broadcaster_type": "affiliate"
        }]
    }))
    .into_response()
}

async fn streams(Query(_params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
    Json(json!({ "data": [], "pagination": {} }))
}

async fn total() -> Json<serde_json::Value> {
    Json(json!({ "total": 0, "data": [] }))
}

async fn token(Form(form): Form<HashMap<String, String>>) -> Response {
    let grant = form.get("grant_type").map(String::as_str);
    let code = form.get("code").map(String::as_str);
    if grant == Some("authorization_code") && code == Some("abc") {
        return Json(json!({
            "access_token": GOOD_TOKEN,
            "refresh_token": "refresh-1",
            "token_type": "bearer"
        }))
        .into_response();
    }
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"status": 400, "message": "Invalid authorization code"})),
    )
        .into_response()
}

/// Serve fake Helix and OAuth endpoints, returning the base URL.
pub(crate) async fn spawn_upstream() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/helix/users", get(users))
        .route("/helix/streams", get(streams))
        .route("/helix/channels/followers", get(total))
        .route("/helix/subscriptions", get(total))
        .route("/oauth2/token", post(token));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// State wired to the upstream at `upstream`, with [`ADMIN_TOKEN`] set.
pub(crate) fn test_state(upstream: &str) -> AppState {
    let http = build_client(Duration::from_secs(5));
    let helix = HelixClient::new(http.clone(), "test-client")
        .with_base_url(&format!("{upstream}/helix"))
        .unwrap();
    let oauth = OAuthClient::new(http, "test-client", "secret")
        .with_base_url(&format!("{upstream}/oauth2"))
        .unwrap();

    let sessions = Arc::new(SessionStore::new());
    let credentials = Arc::new(CredentialRefreshService::new(
        Arc::new(CredentialStore::new()),
        Arc::new(oauth.clone()),
    ));
    let ctx = MonitorContext {
        platform: Arc::new(HelixPlatform::new(helix.clone())),
        sessions: sessions.clone(),
        credentials: credentials.clone(),
        events: MonitorEventBroadcaster::new(),
        max_consecutive_failures: 3,
    };
    let scheduler = Arc::new(Scheduler::new(ctx, SchedulerConfig::default()));

    AppState::new(
        scheduler,
        AnalyticsReader::new(sessions),
        credentials,
        helix,
        oauth,
        BACKEND_URL,
    )
    .with_admin_token(Some(ADMIN_TOKEN.to_string()))
}
