//! Channel actor messages.

use serde::Serialize;
use tokio::sync::oneshot;

use crate::domain::ChannelState;
use crate::monitor::TickOutcome;

#[derive(Debug)]
pub enum ChannelMessage {
    /// Poll now instead of waiting for the timer.
    CheckNow {
        reply: Option<oneshot::Sender<TickOutcome>>,
    },
    GetState {
        reply: oneshot::Sender<ChannelActorState>,
    },
}

/// Snapshot of a running channel actor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelActorState {
    pub channel_id: String,
    pub state: ChannelState,
    pub consecutive_failures: u32,
    pub poll_interval_secs: u64,
}
