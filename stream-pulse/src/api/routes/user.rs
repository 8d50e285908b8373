//! Routes the extension uses to identify the broadcaster.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::HeaderMap,
    routing::get,
};
use helix_client::User;
use tracing::debug;

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::bearer_token;
use crate::api::models::CheckAuthResponse;
use crate::api::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/user", get(current_user))
        .route("/api/check-auth/{channel_id}", get(check_auth))
}

/// Look up the platform user that owns the caller's token.
async fn current_user(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<User>> {
    let token = bearer_token(&headers)
        .map_err(|_| ApiError::unauthorized("Invalid token"))?
        .ok_or_else(|| ApiError::unauthorized("No authorization header"))?;

    match state.helix.get_current_user(token).await {
        Ok(user) => Ok(Json(user)),
        Err(e) => {
            debug!(error = %e, "User lookup rejected");
            Err(ApiError::unauthorized("Invalid token"))
        }
    }
}

async fn check_auth(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Json<CheckAuthResponse> {
    Json(CheckAuthResponse {
        authorized: state.credential_store().contains(&channel_id),
    })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::api::routes::create_router;
    use crate::api::routes::testing::{body_json, get, with_bearer};
    use crate::api::test_support::{GOOD_TOKEN, spawn_upstream, test_state};
    use crate::credentials::ChannelCredential;

    #[tokio::test]
    async fn test_user_requires_header() {
        let app = create_router(test_state("http://127.0.0.1:1"));

        let response = app.oneshot(get("/api/user")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "No authorization header");
    }

    #[tokio::test]
    async fn test_user_proxies_lookup() {
        let upstream = spawn_upstream().await;
        let app = create_router(test_state(&upstream));

        let response = app
            .clone()
            .oneshot(with_bearer("GET", "/api/user", GOOD_TOKEN))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], "1001");
        assert_eq!(body["display_name"], "Streamer");
        assert_eq!(body["broadcaster_type"], "affiliate");

        let response = app
            .oneshot(with_bearer("GET", "/api/user", "stale"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "Invalid token");
    }

    #[tokio::test]
    async fn test_check_auth() {
        let state = test_state("http://127.0.0.1:1");
        state.credential_store().upsert(ChannelCredential {
            access_token: "a".into(),
            refresh_token: None,
            user_id: "1001".into(),
            login: "streamer".into(),
            display_name: "Streamer".into(),
        });
        let app = create_router(state);

        let response = app.clone().oneshot(get("/api/check-auth/1001")).await.unwrap();
        assert_eq!(body_json(response).await, json!({ "authorized": true }));

        let response = app.oneshot(get("/api/check-auth/2002")).await.unwrap();
        assert_eq!(body_json(response).await, json!({ "authorized": false }));
    }
}
