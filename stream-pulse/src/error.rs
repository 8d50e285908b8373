//! Application-wide error types.

use thiserror::Error;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Application-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A store operation was called in a state it does not allow, e.g.
    /// finalizing a channel that has no session in progress.
    #[error("Inconsistent state for channel {channel_id}: {message}")]
    InconsistentState { channel_id: String, message: String },

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Platform error: {0}")]
    Platform(#[from] helix_client::HelixError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn inconsistent(channel_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InconsistentState {
            channel_id: channel_id.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Check if this error indicates a logic bug rather than an outside failure.
    pub fn is_inconsistent_state(&self) -> bool {
        matches!(self, Self::InconsistentState { .. })
    }
}
