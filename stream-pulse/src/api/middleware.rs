//! Bearer-token authentication for administrative routes.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::api::error::ApiError;
use crate::api::server::AppState;

/// Token from an `Authorization: Bearer <token>` header.
///
/// `Ok(None)` when the header is absent; `Err` when it is not a bearer token.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid authorization header"))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim())),
        _ => Err(ApiError::unauthorized("Invalid authorization header")),
    }
}

/// Reject requests that do not carry the configured admin token.
///
/// Without a configured token the routes behind this middleware are disabled.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Err(ApiError::service_unavailable(
            "Administrative routes are disabled",
        ));
    };

    let authorized = match bearer_token(request.headers())? {
        Some(token) => token == expected,
        None => return Err(ApiError::unauthorized("No authorization header")),
    };

    if !authorized {
        tracing::warn!(path = %request.uri().path(), "Invalid admin token");
        return Err(ApiError::unauthorized("Invalid token"));
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&HeaderMap::new()).unwrap(), None);
        assert_eq!(bearer_token(&headers("Bearer abc")).unwrap(), Some("abc"));
        assert!(bearer_token(&headers("Basic abc")).is_err());
        assert!(bearer_token(&headers("Bearer ")).is_err());
    }
}
