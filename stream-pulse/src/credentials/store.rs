//! In-memory credential store.

use dashmap::DashMap;
use tracing::debug;

use super::{ChannelCredential, CredentialError, RefreshedTokens};

#[derive(Debug, Default)]
pub struct CredentialStore {
    credentials: DashMap<String, ChannelCredential>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the credential for its channel, replacing any previous one.
    ///
    /// Returns `true` if the channel was not authorized before.
    pub fn upsert(&self, credential: ChannelCredential) -> bool {
        let channel_id = credential.user_id.clone();
        let previous = self.credentials.insert(channel_id.clone(), credential);
        debug!(channel_id = %channel_id, replaced = previous.is_some(), "Credential stored");
        previous.is_none()
    }

    pub fn get(&self, channel_id: &str) -> Option<ChannelCredential> {
        self.credentials.get(channel_id).map(|c| c.clone())
    }

    pub fn access_token(&self, channel_id: &str) -> Option<String> {
        self.credentials
            .get(channel_id)
            .map(|c| c.access_token.clone())
    }

    /// Replace the tokens of a stored credential.
    ///
    /// A refresh that returns no refresh token keeps the previous one.
    pub fn update_tokens(
        &self,
        channel_id: &str,
        tokens: RefreshedTokens,
    ) -> Result<(), CredentialError> {
        let mut entry = self
            .credentials
            .get_mut(channel_id)
            .ok_or_else(|| CredentialError::NoCredentials(channel_id.to_string()))?;

        entry.access_token = tokens.access_token;
        if let Some(refresh_token) = tokens.refresh_token {
            entry.refresh_token = Some(refresh_token);
        }
        Ok(())
    }

    pub fn remove(&self, channel_id: &str) -> Option<ChannelCredential> {
        self.credentials.remove(channel_id).map(|(_, c)| c)
    }

    pub fn contains(&self, channel_id: &str) -> bool {
        self.credentials.contains_key(channel_id)
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}
