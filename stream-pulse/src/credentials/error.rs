//! Credential errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    /// No credential is stored for the channel.
    #[error("No credentials stored for channel {0}")]
    NoCredentials(String),

    /// Missing refresh token - re-authorization required.
    #[error("Missing refresh token - re-authorization required")]
    MissingRefreshToken,

    /// The platform rejected the refresh token - re-authorization required.
    #[error("Invalid refresh token - re-authorization required")]
    InvalidRefreshToken,

    /// Refresh failed for another reason and may succeed later.
    #[error("Refresh failed: {0}")]
    RefreshFailed(String),
}

impl CredentialError {
    /// Check if the user has to authorize again before tokens can be renewed.
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            Self::NoCredentials(_) | Self::MissingRefreshToken | Self::InvalidRefreshToken
        )
    }
}

impl From<helix_client::HelixError> for CredentialError {
    fn from(err: helix_client::HelixError) -> Self {
        if err.is_auth_expired() {
            Self::InvalidRefreshToken
        } else {
            Self::RefreshFailed(err.to_string())
        }
    }
}
