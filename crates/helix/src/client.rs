//! Authenticated Helix API requests.

use std::sync::LazyLock;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::HelixError;
use crate::models::{DataResponse, Stream, TotalResponse, User};

pub const DEFAULT_HELIX_URL: &str = "https://api.twitch.tv/helix/";

static DEFAULT_BASE_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse(DEFAULT_HELIX_URL).unwrap());

/// Parse a base URL, making sure relative joins append to its path.
pub(crate) fn parse_base_url(base: &str) -> Result<Url, HelixError> {
    let normalized = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    };
    Url::parse(&normalized).map_err(|e| HelixError::InvalidUrl(format!("{base}: {e}")))
}

/// Turn a response into `T`, mapping 401 to [`HelixError::Unauthorized`].
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    endpoint: &str,
) -> Result<T, HelixError> {
    let status = response.status();
    let body = response.text().await?;

    if status == StatusCode::UNAUTHORIZED {
        return Err(HelixError::Unauthorized(body));
    }
    if !status.is_success() {
        return Err(HelixError::Status {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| HelixError::Decode(format!("{endpoint}: {e}")))
}

/// Helix API client bound to one application client id.
///
/// Every call takes the access token to use, so one client serves any
/// number of authorized channels.
#[derive(Debug, Clone)]
pub struct HelixClient {
    client: Client,
    client_id: String,
    base_url: Url,
}

impl HelixClient {
    pub fn new(client: Client, client_id: impl Into<String>) -> Self {
        Self {
            client,
            client_id: client_id.into(),
            base_url: DEFAULT_BASE_URL.clone(),
        }
    }

    /// Point the client at another Helix-compatible host.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, HelixError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, &str)],
        access_token: &str,
    ) -> Result<T, HelixError> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| HelixError::InvalidUrl(format!("{endpoint}: {e}")))?;

        debug!(%url, "Helix request");

        let response = self
            .client
            .get(url)
            .query(query)
            .header("Client-ID", &self.client_id)
            .bearer_auth(access_token)
            .send()
            .await?;

        read_json(response, endpoint).await
    }

    /// Get the current stream for a user, `None` when offline.
    pub async fn get_stream(
        &self,
        user_id: &str,
        access_token: &str,
    ) -> Result<Option<Stream>, HelixError> {
        let response: DataResponse<Stream> = self
            .get_json("streams", &[("user_id", user_id)], access_token)
            .await?;
        Ok(response.data.into_iter().next())
    }

    /// Get the total follower count for a broadcaster.
    pub async fn get_follower_count(
        &self,
        broadcaster_id: &str,
        access_token: &str,
    ) -> Result<u64, HelixError> {
        let response: TotalResponse = self
            .get_json(
                "channels/followers",
                &[("broadcaster_id", broadcaster_id)],
                access_token,
            )
            .await?;
        Ok(response.total.unwrap_or(0))
    }

    /// Get the total subscription count for a broadcaster.
    ///
    /// Requires the `channel:read:subscriptions` scope.
    pub async fn get_subscription_count(
        &self,
        broadcaster_id: &str,
        access_token: &str,
    ) -> Result<u64, HelixError> {
        let response: TotalResponse = self
            .get_json(
                "subscriptions",
                &[("broadcaster_id", broadcaster_id)],
                access_token,
            )
            .await?;
        Ok(response.total.unwrap_or(0))
    }

    /// Get the user that owns `access_token`.
    pub async fn get_current_user(&self, access_token: &str) -> Result<User, HelixError> {
        let response: DataResponse<User> = self.get_json("users", &[], access_token).await?;
        response
            .data
            .into_iter()
            .next()
            .ok_or(HelixError::EmptyResponse("users"))
    }
}
