//! Administrative control of channel monitors.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{CheckNowResponse, MonitorStatusResponse, StopMonitorResponse};
use crate::api::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{channel_id}", get(get_monitor).delete(stop_monitor))
        .route("/{channel_id}/check", post(check_now))
}

async fn get_monitor(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Json<MonitorStatusResponse> {
    let actor = state.scheduler.channel_state(&channel_id).await.ok();
    Json(MonitorStatusResponse {
        monitoring: actor.is_some(),
        channel_id,
        actor,
    })
}

/// Stop the monitor and forget the channel's credentials.
///
/// A session in progress is discarded, not finalized.
async fn stop_monitor(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> ApiResult<Json<StopMonitorResponse>> {
    let stopped = state.scheduler.stop(&channel_id).await;
    let credential_removed = state.credential_store().remove(&channel_id).is_some();
    state.credentials.forget(&channel_id);

    if !stopped && !credential_removed {
        return Err(ApiError::not_found(format!(
            "Channel '{channel_id}' is not known"
        )));
    }

    info!(channel_id = %channel_id, stopped, credential_removed, "Channel removed");
    Ok(Json(StopMonitorResponse {
        stopped,
        credential_removed,
    }))
}

async fn check_now(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> ApiResult<Json<CheckNowResponse>> {
    let outcome = state.scheduler.check_now(&channel_id).await?;
    let actor = state.scheduler.channel_state(&channel_id).await.ok();

    Ok(Json(CheckNowResponse {
        outcome: outcome.as_str(),
        actor,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::api::routes::create_router;
    use crate::api::routes::testing::{body_json, with_bearer};
    use crate::api::test_support::{ADMIN_TOKEN, GOOD_TOKEN, USER_ID, spawn_upstream, test_state};
    use crate::credentials::ChannelCredential;

    fn authorize(state: &crate::api::server::AppState) {
        state.credential_store().upsert(ChannelCredential {
            access_token: GOOD_TOKEN.into(),
            refresh_token: Some("refresh-1".into()),
            user_id: USER_ID.into(),
            login: "streamer".into(),
            display_name: "Streamer".into(),
        });
    }

    #[tokio::test]
    async fn test_requires_admin_token() {
        let app = create_router(test_state("http://127.0.0.1:1"));

        let response = app
            .clone()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/monitor/1001")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "No authorization header");

        let response = app
            .oneshot(with_bearer("GET", "/api/monitor/1001", "wrong"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_disabled_without_admin_token() {
        let state = test_state("http://127.0.0.1:1").with_admin_token(None);
        let app = create_router(state);

        let response = app
            .oneshot(with_bearer("DELETE", "/api/monitor/1001", ADMIN_TOKEN))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_check_and_stop() {
        let upstream = spawn_upstream().await;
        let state = test_state(&upstream);
        authorize(&state);
        assert!(state.scheduler.start(USER_ID));
        let app = create_router(state.clone());

        let response = app
            .clone()
            .oneshot(with_bearer("GET", "/api/monitor/1001", ADMIN_TOKEN))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["monitoring"], true);
        assert_eq!(body["actor"]["state"]["state"], "OFFLINE");

        let response = app
            .clone()
            .oneshot(with_bearer("POST", "/api/monitor/1001/check", ADMIN_TOKEN))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["outcome"], "offline");

        let response = app
            .clone()
            .oneshot(with_bearer("DELETE", "/api/monitor/1001", ADMIN_TOKEN))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["stopped"], true);
        assert_eq!(body["credentialRemoved"], true);
        assert!(!state.scheduler.is_monitoring(USER_ID));
        assert!(!state.credential_store().contains(USER_ID));

        let response = app
            .oneshot(with_bearer("DELETE", "/api/monitor/1001", ADMIN_TOKEN))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_check_unmonitored_channel() {
        let app = create_router(test_state("http://127.0.0.1:1"));

        let response = app
            .oneshot(with_bearer("POST", "/api/monitor/404/check", ADMIN_TOKEN))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    }
}
