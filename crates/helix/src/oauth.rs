//! OAuth2 authorization-code flow against `id.twitch.tv`.

use std::sync::LazyLock;

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::client::{parse_base_url, read_json};
use crate::error::HelixError;
use crate::models::TokenResponse;

pub const DEFAULT_OAUTH_URL: &str = "https://id.twitch.tv/oauth2/";

/// Scopes requested by the browser extension.
pub const DEFAULT_SCOPES: &[&str] = &["channel:read:subscriptions", "user:read:email"];

static DEFAULT_BASE_URL: LazyLock<Url> = LazyLock::new(|| Url::parse(DEFAULT_OAUTH_URL).unwrap());

/// Token endpoint client holding the application credentials.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    client: Client,
    client_id: String,
    client_secret: String,
    base_url: Url,
}

impl OAuthClient {
    pub fn new(
        client: Client,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: DEFAULT_BASE_URL.clone(),
        }
    }

    /// Point the client at another OAuth2-compatible host.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, HelixError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    fn endpoint(&self, path: &str) -> Result<Url, HelixError> {
        self.base_url
            .join(path)
            .map_err(|e| HelixError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Build the URL the user is sent to in order to grant access.
    pub fn authorize_url(&self, redirect_uri: &str, scopes: &[&str]) -> Result<Url, HelixError> {
        let mut url = self.endpoint("authorize")?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &scopes.join(" "));
        Ok(url)
    }

    async fn post_token(&self, params: &[(&str, &str)]) -> Result<TokenResponse, HelixError> {
        let url = self.endpoint("token")?;
        let mut form = vec![
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        form.extend_from_slice(params);

        let response = self.client.post(url).form(&form).send().await?;
        let tokens: TokenResponse = read_json(response, "oauth2/token").await?;

        debug!(
            expires_in = ?tokens.expires_in,
            scopes = ?tokens.scope,
            "OAuth token issued"
        );
        Ok(tokens)
    }

    /// Exchange an authorization code for access and refresh tokens.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, HelixError> {
        self.post_token(&[
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", redirect_uri),
        ])
        .await
    }

    /// Obtain a new access token from a refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, HelixError> {
        self.post_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }
}
