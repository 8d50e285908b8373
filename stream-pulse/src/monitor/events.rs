//! Monitor events.
//!
//! Emitted by channel monitors as channels go live, go offline or fail.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use super::StopReason;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MonitorEvent {
    /// A session started.
    ChannelLive {
        channel_id: String,
        stream_id: String,
        title: String,
        game_name: String,
        viewers: u64,
        timestamp: DateTime<Utc>,
    },
    /// A session completed.
    ChannelOffline {
        channel_id: String,
        stream_id: String,
        duration_hours: f64,
        followers_gained: i64,
        timestamp: DateTime<Utc>,
    },
    /// A poll failed and will be retried on the next tick.
    TransientError {
        channel_id: String,
        error_message: String,
        consecutive_errors: u32,
        timestamp: DateTime<Utc>,
    },
    /// The channel's monitor exited.
    MonitoringStopped {
        channel_id: String,
        reason: StopReason,
        timestamp: DateTime<Utc>,
    },
}

impl MonitorEvent {
    pub fn channel_id(&self) -> &str {
        match self {
            Self::ChannelLive { channel_id, .. }
            | Self::ChannelOffline { channel_id, .. }
            | Self::TransientError { channel_id, .. }
            | Self::MonitoringStopped { channel_id, .. } => channel_id,
        }
    }

    /// Get a human-readable description of the event.
    pub fn description(&self) -> String {
        match self {
            Self::ChannelLive {
                channel_id, title, ..
            } => format!("{channel_id} is now live: {title}"),
            Self::ChannelOffline {
                channel_id,
                duration_hours,
                followers_gained,
                ..
            } => format!(
                "{channel_id} went offline after {duration_hours:.2}h, followers gained: {followers_gained}"
            ),
            Self::TransientError {
                channel_id,
                error_message,
                consecutive_errors,
                ..
            } => format!("{channel_id}: {error_message} (attempt {consecutive_errors})"),
            Self::MonitoringStopped {
                channel_id, reason, ..
            } => format!("{channel_id}: monitoring stopped ({reason})"),
        }
    }
}

/// Broadcaster for monitor events.
#[derive(Clone)]
pub struct MonitorEventBroadcaster {
    sender: broadcast::Sender<MonitorEvent>,
}

impl MonitorEventBroadcaster {
    /// Create a new broadcaster with default capacity (256).
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.sender.subscribe()
    }

    /// Publish an event, returning the number of subscribers that got it.
    ///
    /// Having no subscribers is not an error.
    pub fn publish(&self, event: MonitorEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for MonitorEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
