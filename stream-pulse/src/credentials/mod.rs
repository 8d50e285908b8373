//! Per-channel OAuth credentials.
//!
//! - [`ChannelCredential`]: tokens and identity captured on authorization
//! - [`CredentialStore`]: in-memory credential map keyed by channel id
//! - [`TokenRefresher`]: platform hook that trades a refresh token for new tokens
//! - [`CredentialRefreshService`]: refreshes a channel's tokens and stores them

mod error;
mod manager;
mod service;
mod store;
mod types;

pub use error::CredentialError;
pub use manager::TokenRefresher;
pub use service::CredentialRefreshService;
pub use store::CredentialStore;
pub use types::{ChannelCredential, RefreshedTokens};
