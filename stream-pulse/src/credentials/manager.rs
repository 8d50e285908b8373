//! Platform token refresh hook.

use async_trait::async_trait;

use super::{CredentialError, RefreshedTokens};

/// Trades a refresh token for a new access token on the platform.
#[async_trait]
pub trait TokenRefresher: Send + Sync + 'static {
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedTokens, CredentialError>;
}

#[async_trait]
impl TokenRefresher for helix_client::OAuthClient {
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedTokens, CredentialError> {
        let tokens = helix_client::OAuthClient::refresh(self, refresh_token).await?;
        Ok(tokens.into())
    }
}
