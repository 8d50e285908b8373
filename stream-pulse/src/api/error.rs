//! API error handling.
//!
//! Every error response has the body `{"error": <message>, "code": <CODE>}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::Error;
use crate::scheduler::SchedulerError;

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Error code for programmatic handling
    pub code: String,
}

/// API error type that can be converted to HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "CONFLICT", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorResponse {
            error: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound { entity_type, id } => {
                ApiError::not_found(format!("{entity_type} with id '{id}' not found"))
            }
            Error::InconsistentState { ref channel_id, .. } => {
                tracing::error!(channel_id = %channel_id, error = %err, "Inconsistent session state");
                ApiError::conflict("Channel is in an unexpected state")
            }
            Error::Configuration(msg) | Error::ApiError(msg) => ApiError::bad_request(msg),
            Error::Platform(e) => {
                tracing::warn!(error = %e, "Platform request failed");
                if e.is_auth_expired() {
                    ApiError::unauthorized("Invalid token")
                } else {
                    ApiError::bad_gateway("Platform request failed")
                }
            }
            Error::Io(e) => {
                tracing::error!("IO error: {}", e);
                ApiError::internal("IO error occurred")
            }
            _ => {
                tracing::error!("Unexpected error: {}", err);
                ApiError::internal("An unexpected error occurred")
            }
        }
    }
}

impl From<SchedulerError> for ApiError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::NotMonitored(id) => {
                ApiError::not_found(format!("Channel '{id}' is not being monitored"))
            }
            other => {
                tracing::warn!(error = %other, "Channel actor unavailable");
                ApiError::service_unavailable("Channel monitor is not responding")
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let body = ApiErrorResponse {
            error: "No authorization header".into(),
            code: "UNAUTHORIZED".into(),
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({ "error": "No authorization header", "code": "UNAUTHORIZED" })
        );
    }

    #[test]
    fn test_from_error_hides_internals() {
        let api: ApiError = Error::Other("secret path /etc/x".into()).into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.message.contains("/etc/x"));

        let api: ApiError = Error::not_found("Channel", "42").into();
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.code, "NOT_FOUND");

        let api: ApiError = Error::Platform(helix_client::HelixError::Unauthorized(String::new())).into();
        assert_eq!(api.status, StatusCode::UNAUTHORIZED);

        let api: ApiError = Error::inconsistent("1", "no session").into();
        assert_eq!(api.status, StatusCode::CONFLICT);
    }
}
