//! Client for the Twitch Helix API.
//!
//! Covers the small surface needed to follow a broadcaster's sessions:
//! - stream status by user id
//! - follower and subscription totals by broadcaster id
//! - user lookup for the token owner
//! - OAuth authorization-code exchange and token refresh

pub mod client;
pub mod error;
pub mod http;
pub mod models;
pub mod oauth;

pub use client::{DEFAULT_HELIX_URL, HelixClient};
pub use error::HelixError;
pub use models::{Stream, TokenResponse, User};
pub use oauth::{DEFAULT_OAUTH_URL, OAuthClient};
