use thiserror::Error;

#[derive(Debug, Error)]
pub enum HelixError {
    /// The platform rejected the credential (HTTP 401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("decode error: {0}")]
    Decode(String),
    #[error("empty response from {0}")]
    EmptyResponse(&'static str),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl HelixError {
    /// Check if the error means the access token is no longer accepted.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Check if the error may clear up on a later attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::Decode(_) | Self::EmptyResponse(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Unauthorized(_) | Self::InvalidUrl(_) => false,
        }
    }
}
