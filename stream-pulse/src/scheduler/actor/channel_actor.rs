//! Channel actor.
//!
//! Drives one [`ChannelMonitor`] from a `tokio::time::interval`. Ticks are
//! awaited inside the actor loop, so a channel never has two polls in flight;
//! a poll that outlasts the interval delays the following ones instead.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::monitor::{ChannelMonitor, MonitorEvent, MonitorEventBroadcaster, StopReason, TickOutcome};

use super::messages::{ChannelActorState, ChannelMessage};

pub struct ChannelActor {
    monitor: ChannelMonitor,
    mailbox: mpsc::Receiver<ChannelMessage>,
    cancellation_token: CancellationToken,
    poll_interval: Duration,
    events: MonitorEventBroadcaster,
}

impl ChannelActor {
    pub fn new(
        monitor: ChannelMonitor,
        mailbox: mpsc::Receiver<ChannelMessage>,
        cancellation_token: CancellationToken,
        poll_interval: Duration,
        events: MonitorEventBroadcaster,
    ) -> Self {
        Self {
            monitor,
            mailbox,
            cancellation_token,
            poll_interval,
            events,
        }
    }

    /// Run until cancelled or the monitor gives up.
    ///
    /// The first poll happens immediately.
    pub async fn run(mut self) -> StopReason {
        info!(
            channel_id = %self.monitor.channel_id(),
            interval_secs = self.poll_interval.as_secs(),
            "Channel monitor started"
        );

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let reason = loop {
            tokio::select! {
                biased;

                _ = self.cancellation_token.cancelled() => {
                    break StopReason::Cancelled;
                }

                msg = self.mailbox.recv() => {
                    let Some(msg) = msg else {
                        debug!(channel_id = %self.monitor.channel_id(), "Mailbox closed");
                        break StopReason::Cancelled;
                    };
                    match msg {
                        ChannelMessage::CheckNow { reply } => {
                            let outcome = self.monitor.tick().await;
                            interval.reset();
                            let stop = match &outcome {
                                TickOutcome::Stop(reason) => Some(*reason),
                                _ => None,
                            };
                            if let Some(reply) = reply {
                                let _ = reply.send(outcome);
                            }
                            if let Some(reason) = stop {
                                break reason;
                            }
                        }
                        ChannelMessage::GetState { reply } => {
                            let _ = reply.send(self.snapshot());
                        }
                    }
                }

                _ = interval.tick() => {
                    if let TickOutcome::Stop(reason) = self.monitor.tick().await {
                        break reason;
                    }
                }
            }
        };

        // A monitor that gives up on its own leaves no session behind.
        if reason != StopReason::Cancelled
            && let Some(session) = self.monitor.discard_session()
        {
            info!(
                channel_id = %self.monitor.channel_id(),
                stream_id = %session.stream_id,
                "Discarded in-progress session"
            );
        }

        info!(
            channel_id = %self.monitor.channel_id(),
            reason = %reason,
            "Channel monitor stopped"
        );
        self.events.publish(MonitorEvent::MonitoringStopped {
            channel_id: self.monitor.channel_id().to_string(),
            reason,
            timestamp: Utc::now(),
        });
        reason
    }

    fn snapshot(&self) -> ChannelActorState {
        ChannelActorState {
            channel_id: self.monitor.channel_id().to_string(),
            state: self.monitor.state(),
            consecutive_failures: self.monitor.consecutive_failures(),
            poll_interval_secs: self.poll_interval.as_secs(),
        }
    }
}
