//! Per-channel session analytics for the extension.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::analytics::AnalyticsReport;
use crate::api::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/{channel_id}", get(get_analytics))
}

/// A channel with no completed sessions gets an empty report, not a 404.
async fn get_analytics(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Json<AnalyticsReport> {
    Json(state.analytics.report(&channel_id))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::api::routes::create_router;
    use crate::api::routes::testing::{body_json, get};
    use crate::api::test_support::test_state;
    use crate::domain::SessionStart;
    use crate::store::SessionEnd;

    #[tokio::test]
    async fn test_unknown_channel_is_empty() {
        let app = create_router(test_state("http://127.0.0.1:1"));

        let response = app.oneshot(get("/api/analytics/nobody")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "lastStream": null, "totalStreams": 0, "allSessions": [] })
        );
    }

    #[tokio::test]
    async fn test_completed_session_is_reported() {
        let state = test_state("http://127.0.0.1:1");
        let sessions = state.scheduler.context().sessions.clone();
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        sessions
            .begin(
                "42",
                SessionStart {
                    stream_id: "s1".into(),
                    title: "hello".into(),
                    game_name: "Just Chatting".into(),
                    start_time: start,
                    viewers: 120,
                    followers: 10,
                    subs: 2,
                },
            )
            .unwrap();
        sessions.update("42", 180).unwrap();
        sessions
            .finalize(
                "42",
                SessionEnd {
                    end_time: start + Duration::minutes(90),
                    followers: 15,
                    subs: 1,
                },
            )
            .unwrap();

        let app = create_router(state);
        let response = app.oneshot(get("/api/analytics/42")).await.unwrap();
        let body = body_json(response).await;

        assert_eq!(body["totalStreams"], 1);
        let last = &body["lastStream"];
        assert_eq!(last["streamId"], "s1");
        assert_eq!(last["peakViewers"], 180);
        assert_eq!(last["avgViewers"], 150.0);
        assert_eq!(last["duration"], 1.5);
        assert_eq!(last["followersGained"], 5);
        assert_eq!(last["subsGained"], -1);
        assert_eq!(last["startTime"], "2024-05-01T12:00:00Z");
        assert_eq!(body["allSessions"].as_array().unwrap().len(), 1);
    }
}
