//! Helix response payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope used by list endpoints (`{"data": [...]}`).
#[derive(Debug, Clone, Deserialize)]
pub struct DataResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Envelope used by count endpoints (`{"total": n, ...}`).
#[derive(Debug, Clone, Deserialize)]
pub struct TotalResponse {
    #[serde(default)]
    pub total: Option<u64>,
}

/// A live stream as reported by `GET /helix/streams`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_login: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub game_id: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(rename = "type", default)]
    pub stream_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub viewer_count: u64,
    pub started_at: DateTime<Utc>,
}

/// A user as reported by `GET /helix/users`.
///
/// Fields not modelled here are kept in `extra` so the user can be
/// passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub login: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Token endpoint response (`POST /oauth2/token`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Vec<String>,
    #[serde(default)]
    pub token_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_deserialize() {
        let json = r#"{
            "id": "40952121085",
            "user_id": "101051819",
            "user_login": "afro",
            "user_name": "Afro",
            "game_id": "32982",
            "game_name": "Grand Theft Auto V",
            "type": "live",
            "title": "Jacob: Digital Den Laptops & Tablets",
            "viewer_count": 1490,
            "started_at": "2021-03-10T03:18:11Z",
            "language": "en",
            "tags": ["English"]
        }"#;

        let stream: Stream = serde_json::from_str(json).unwrap();
        assert_eq!(stream.id, "40952121085");
        assert_eq!(stream.viewer_count, 1490);
        assert_eq!(stream.stream_type, "live");
        assert_eq!(stream.started_at.to_rfc3339(), "2021-03-10T03:18:11+00:00");
    }

    #[test]
    fn test_user_keeps_unknown_fields() {
        let json = r#"{
            "id": "141981764",
            "login": "twitchdev",
            "display_name": "TwitchDev",
            "broadcaster_type": "partner",
            "view_count": 5980557
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.login, "twitchdev");
        assert!(user.email.is_none());

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["broadcaster_type"], "partner");
        assert_eq!(value["view_count"], 5980557);
    }

    #[test]
    fn test_total_defaults_to_none() {
        let total: TotalResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert_eq!(total.total, None);
    }
}
