//! Read-only analytics over the session store.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::Session;
use crate::store::SessionStore;

/// Analytics for one channel as served to the extension.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub last_stream: Option<Session>,
    pub total_streams: usize,
    pub all_sessions: Vec<Session>,
}

#[derive(Clone)]
pub struct AnalyticsReader {
    sessions: Arc<SessionStore>,
}

impl AnalyticsReader {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    pub fn last_stream(&self, channel_id: &str) -> Option<Session> {
        self.sessions.latest(channel_id)
    }

    pub fn total_streams(&self, channel_id: &str) -> usize {
        self.sessions.completed_count(channel_id)
    }

    pub fn all_sessions(&self, channel_id: &str) -> Vec<Session> {
        self.sessions.all(channel_id)
    }

    /// Latest session, count and history taken from one snapshot.
    pub fn report(&self, channel_id: &str) -> AnalyticsReport {
        let all_sessions = self.sessions.all(channel_id);
        AnalyticsReport {
            last_stream: all_sessions.last().cloned(),
            total_streams: all_sessions.len(),
            all_sessions,
        }
    }

    /// Number of channels with a session in progress.
    pub fn active_channels(&self) -> usize {
        self.sessions.live_count()
    }
}
