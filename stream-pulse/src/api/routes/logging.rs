//! Runtime log filter routes.

use axum::{Json, Router, extract::State, routing::get};

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{LoggingConfigResponse, ModuleInfo, UpdateLogFilterRequest};
use crate::api::server::AppState;
use crate::logging::{LoggingConfig, available_modules};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_logging_config).put(update_logging_config))
}

fn logging_config(state: &AppState) -> ApiResult<&LoggingConfig> {
    state
        .logging_config
        .as_deref()
        .ok_or_else(|| ApiError::service_unavailable("Logging configuration not available"))
}

fn response(config: &LoggingConfig) -> LoggingConfigResponse {
    let modules = available_modules()
        .into_iter()
        .map(|(name, desc)| ModuleInfo {
            name: name.to_string(),
            description: desc.to_string(),
        })
        .collect();

    LoggingConfigResponse {
        filter: config.get_filter(),
        available_modules: modules,
    }
}

async fn get_logging_config(
    State(state): State<AppState>,
) -> ApiResult<Json<LoggingConfigResponse>> {
    Ok(Json(response(logging_config(&state)?)))
}

async fn update_logging_config(
    State(state): State<AppState>,
    Json(request): Json<UpdateLogFilterRequest>,
) -> ApiResult<Json<LoggingConfigResponse>> {
    let config = logging_config(&state)?;
    config
        .set_filter(&request.filter)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(Json(response(config)))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::routes::create_router;
    use crate::api::routes::testing::{body_json, with_bearer};
    use crate::api::test_support::{ADMIN_TOKEN, test_state};
    use crate::logging::test_logging_config;

    fn put_filter(filter: &str) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri("/api/logging")
            .header("authorization", format!("Bearer {ADMIN_TOKEN}"))
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({ "filter": filter }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_and_update_filter() {
        let state = test_state("http://127.0.0.1:1").with_logging(test_logging_config());
        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(with_bearer("GET", "/api/logging", ADMIN_TOKEN))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["filter"].as_str().unwrap().contains("stream_pulse=info"));
        assert!(!body["availableModules"].as_array().unwrap().is_empty());

        let response = app
            .clone()
            .oneshot(put_filter("stream_pulse=debug"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["filter"], "stream_pulse=debug");

        let response = app.oneshot(put_filter("stream_pulse=notalevel")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unavailable_without_logging() {
        let app = create_router(test_state("http://127.0.0.1:1"));

        let response = app
            .oneshot(with_bearer("GET", "/api/logging", ADMIN_TOKEN))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
