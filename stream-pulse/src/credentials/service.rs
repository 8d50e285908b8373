//! Credential refresh service.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::error::CredentialError;
use super::manager::TokenRefresher;
use super::store::CredentialStore;

/// Refreshes a channel's access token and writes the result back to the store.
pub struct CredentialRefreshService {
    store: Arc<CredentialStore>,
    refresher: Arc<dyn TokenRefresher>,
    /// Per-channel locks so concurrent callers do not spend one refresh
    /// token twice.
    refresh_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl CredentialRefreshService {
    pub fn new(store: Arc<CredentialStore>, refresher: Arc<dyn TokenRefresher>) -> Self {
        Self {
            store,
            refresher,
            refresh_locks: DashMap::new(),
        }
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Refresh the channel's tokens, returning the new access token.
    #[instrument(skip(self))]
    pub async fn refresh(&self, channel_id: &str) -> Result<String, CredentialError> {
        let lock = self
            .refresh_locks
            .entry(channel_id.to_string())
            .or_default()
            .clone();
        let _guard = lock.lock().await;

        let credential = self
            .store
            .get(channel_id)
            .ok_or_else(|| CredentialError::NoCredentials(channel_id.to_string()))?;
        let refresh_token = credential
            .refresh_token
            .ok_or(CredentialError::MissingRefreshToken)?;

        let tokens = match self.refresher.refresh(&refresh_token).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                return Err(e);
            }
        };

        let access_token = tokens.access_token.clone();
        self.store.update_tokens(channel_id, tokens)?;
        info!("Access token refreshed");
        Ok(access_token)
    }

    /// Forget the refresh lock of a channel that is no longer authorized.
    pub fn forget(&self, channel_id: &str) {
        self.refresh_locks.remove(channel_id);
    }
}
