//! Session store.
//!
//! Holds the in-progress session of every live channel and the ordered
//! history of completed sessions. Each channel's entry sits in its own
//! `DashMap` shard, and every operation below runs under that entry's lock
//! only, so one call either applies fully or not at all.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use crate::domain::{ActiveSession, Session, SessionStart};
use crate::{Error, Result};

#[derive(Debug, Default)]
struct ChannelSessions {
    active: Option<ActiveSession>,
    /// Completed sessions in completion order.
    history: Vec<Session>,
}

/// End-of-session counts fetched on the poll that found the stream over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionEnd {
    pub end_time: DateTime<Utc>,
    pub followers: u64,
    pub subs: u64,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    channels: DashMap<String, ChannelSessions>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Monitor-side mutations ==========

    /// Start a session for a channel that has none in progress.
    pub fn begin(&self, channel_id: &str, start: SessionStart) -> Result<ActiveSession> {
        let mut entry = self.channels.entry(channel_id.to_string()).or_default();
        if let Some(existing) = &entry.active {
            return Err(Error::inconsistent(
                channel_id,
                format!("session {} already in progress", existing.stream_id),
            ));
        }

        let session = ActiveSession::begin(channel_id, start);
        debug!(channel_id, stream_id = %session.stream_id, "Session started");
        entry.active = Some(session.clone());
        Ok(session)
    }

    /// Add a viewer sample to the in-progress session.
    pub fn update(&self, channel_id: &str, viewers: u64) -> Result<ActiveSession> {
        let mut entry = self
            .channels
            .get_mut(channel_id)
            .ok_or_else(|| Error::inconsistent(channel_id, "no session in progress"))?;
        let session = entry
            .active
            .as_mut()
            .ok_or_else(|| Error::inconsistent(channel_id, "no session in progress"))?;

        session.record_sample(viewers);
        Ok(session.clone())
    }

    /// Complete the in-progress session and append it to the history.
    pub fn finalize(&self, channel_id: &str, end: SessionEnd) -> Result<Session> {
        let mut entry = self
            .channels
            .get_mut(channel_id)
            .ok_or_else(|| Error::inconsistent(channel_id, "no session to finalize"))?;
        let active = entry
            .active
            .take()
            .ok_or_else(|| Error::inconsistent(channel_id, "no session to finalize"))?;

        let session = active.finalize(end.end_time, end.followers, end.subs);
        debug!(channel_id, stream_id = %session.stream_id, "Session completed");
        entry.history.push(session.clone());
        Ok(session)
    }

    /// Complete the in-progress session and start `next` in its place.
    ///
    /// Used when a poll reports a different stream id than the one in
    /// progress.
    pub fn rollover(
        &self,
        channel_id: &str,
        end: SessionEnd,
        next: SessionStart,
    ) -> Result<(Session, ActiveSession)> {
        let mut entry = self
            .channels
            .get_mut(channel_id)
            .ok_or_else(|| Error::inconsistent(channel_id, "no session to roll over"))?;
        let active = entry
            .active
            .take()
            .ok_or_else(|| Error::inconsistent(channel_id, "no session to roll over"))?;

        let finished = active.finalize(end.end_time, end.followers, end.subs);
        let started = ActiveSession::begin(channel_id, next);
        debug!(
            channel_id,
            ended = %finished.stream_id,
            started = %started.stream_id,
            "Session rolled over"
        );

        entry.history.push(finished.clone());
        entry.active = Some(started.clone());
        Ok((finished, started))
    }

    /// Drop the in-progress session without recording it.
    pub fn discard(&self, channel_id: &str) -> Option<ActiveSession> {
        self.channels
            .get_mut(channel_id)
            .and_then(|mut entry| entry.active.take())
    }

    // ========== Queries ==========

    /// Snapshot of the in-progress session.
    pub fn active(&self, channel_id: &str) -> Option<ActiveSession> {
        self.channels
            .get(channel_id)
            .and_then(|entry| entry.active.clone())
    }

    /// Most recently completed session.
    pub fn latest(&self, channel_id: &str) -> Option<Session> {
        self.channels
            .get(channel_id)
            .and_then(|entry| entry.history.last().cloned())
    }

    /// All completed sessions, oldest first.
    pub fn all(&self, channel_id: &str) -> Vec<Session> {
        self.channels
            .get(channel_id)
            .map(|entry| entry.history.clone())
            .unwrap_or_default()
    }

    pub fn completed_count(&self, channel_id: &str) -> usize {
        self.channels
            .get(channel_id)
            .map(|entry| entry.history.len())
            .unwrap_or(0)
    }

    /// Number of channels with a session in progress.
    pub fn live_count(&self) -> usize {
        self.channels
            .iter()
            .filter(|entry| entry.active.is_some())
            .count()
    }
}
