//! Platform lookups used by the channel monitor.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use helix_client::{HelixClient, HelixError};
use thiserror::Error;
use tracing::debug;

use crate::domain::SessionStart;

/// Why a lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The platform rejected the access token.
    #[error("access token rejected: {0}")]
    AuthExpired(String),
    /// Network, server or decode failure; the next poll may succeed.
    #[error("fetch failed: {0}")]
    Transient(String),
}

impl FetchError {
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired(_))
    }
}

impl From<HelixError> for FetchError {
    fn from(err: HelixError) -> Self {
        if err.is_auth_expired() {
            Self::AuthExpired(err.to_string())
        } else {
            Self::Transient(err.to_string())
        }
    }
}

/// A broadcast currently on air.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveStream {
    pub stream_id: String,
    pub title: String,
    pub game_name: String,
    pub started_at: DateTime<Utc>,
    pub viewers: u64,
}

impl LiveStream {
    /// Starting record for this broadcast with the given baseline counts.
    pub fn session_start(&self, followers: u64, subs: u64) -> SessionStart {
        SessionStart {
            stream_id: self.stream_id.clone(),
            title: self.title.clone(),
            game_name: self.game_name.clone(),
            start_time: self.started_at,
            viewers: self.viewers,
            followers,
            subs,
        }
    }
}

impl From<helix_client::Stream> for LiveStream {
    fn from(stream: helix_client::Stream) -> Self {
        Self {
            stream_id: stream.id,
            title: stream.title,
            game_name: stream.game_name,
            started_at: stream.started_at,
            viewers: stream.viewer_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiveStatus {
    Offline,
    Live(LiveStream),
}

/// Lookups a channel monitor performs on every poll.
#[async_trait]
pub trait PlatformApi: Send + Sync + 'static {
    async fn live_status(&self, channel_id: &str, access_token: &str)
    -> Result<LiveStatus, FetchError>;

    async fn follower_count(&self, channel_id: &str, access_token: &str)
    -> Result<u64, FetchError>;

    async fn subscriber_count(
        &self,
        channel_id: &str,
        access_token: &str,
    ) -> Result<u64, FetchError>;
}

/// [`PlatformApi`] backed by the Helix API.
#[derive(Debug, Clone)]
pub struct HelixPlatform {
    client: HelixClient,
}

impl HelixPlatform {
    pub fn new(client: HelixClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PlatformApi for HelixPlatform {
    async fn live_status(
        &self,
        channel_id: &str,
        access_token: &str,
    ) -> Result<LiveStatus, FetchError> {
        let status = match self.client.get_stream(channel_id, access_token).await? {
            Some(stream) => LiveStatus::Live(stream.into()),
            None => LiveStatus::Offline,
        };
        Ok(status)
    }

    async fn follower_count(
        &self,
        channel_id: &str,
        access_token: &str,
    ) -> Result<u64, FetchError> {
        Ok(self
            .client
            .get_follower_count(channel_id, access_token)
            .await?)
    }

    async fn subscriber_count(
        &self,
        channel_id: &str,
        access_token: &str,
    ) -> Result<u64, FetchError> {
        // Channels without a subscription program answer with a 4xx.
        match self.client.get_subscription_count(channel_id, access_token).await {
            Ok(total) => Ok(total),
            Err(HelixError::Status { status, body }) if (400..500).contains(&status) => {
                debug!(channel_id, status, body = %body, "Subscription count unavailable, using 0");
                Ok(0)
            }
            Err(err) => Err(err.into()),
        }
    }
}
