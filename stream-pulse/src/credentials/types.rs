//! Credential types.

use std::fmt;

use serde::Serialize;

/// Tokens and identity for one authorized channel.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelCredential {
    #[serde(skip_serializing)]
    pub access_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub user_id: String,
    pub login: String,
    pub display_name: String,
}

// Tokens stay out of logs.
impl fmt::Debug for ChannelCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelCredential")
            .field("user_id", &self.user_id)
            .field("login", &self.login)
            .field("display_name", &self.display_name)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish_non_exhaustive()
    }
}

/// Result of a successful token refresh.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshedTokens {
    pub access_token: String,
    /// Replacement refresh token, when the platform rotates it.
    pub refresh_token: Option<String>,
}

impl fmt::Debug for RefreshedTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshedTokens")
            .field("rotated", &self.refresh_token.is_some())
            .finish_non_exhaustive()
    }
}

impl From<helix_client::TokenResponse> for RefreshedTokens {
    fn from(tokens: helix_client::TokenResponse) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}
