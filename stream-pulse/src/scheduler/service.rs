//! Scheduler service.

use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::monitor::{ChannelMonitor, MonitorContext, TickOutcome};

use super::actor::{
    ActorHandle, ActorMetadata, ActorRegistry, ChannelActor, ChannelActorState, ChannelMessage,
    DEFAULT_MAILBOX_CAPACITY, SendError,
};

/// Default interval between polls of one channel.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub poll_interval: Duration,
    pub mailbox_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
        }
    }
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Channel {0} is not being monitored")]
    NotMonitored(String),
    #[error("Failed to reach channel actor: {0}")]
    Send(#[from] SendError),
    #[error("Channel actor exited before replying")]
    NoReply,
}

/// Starts, stops and queries channel actors.
pub struct Scheduler {
    ctx: MonitorContext,
    config: SchedulerConfig,
    registry: Mutex<ActorRegistry>,
    /// Parent of every actor's token.
    cancellation_token: CancellationToken,
}

impl Scheduler {
    pub fn new(ctx: MonitorContext, config: SchedulerConfig) -> Self {
        Self {
            ctx,
            config,
            registry: Mutex::new(ActorRegistry::new()),
            cancellation_token: CancellationToken::new(),
        }
    }

    pub fn context(&self) -> &MonitorContext {
        &self.ctx
    }

    pub fn poll_interval(&self) -> Duration {
        self.config.poll_interval
    }

    /// Start monitoring a channel.
    ///
    /// Does nothing and returns `false` when the channel already has a
    /// running actor; that actor reads the current token on its next tick.
    pub fn start(&self, channel_id: &str) -> bool {
        let mut registry = self.registry.lock();
        if registry.is_running(channel_id) {
            debug!(channel_id, "Channel already monitored");
            return false;
        }

        let (tx, rx) = mpsc::channel(self.config.mailbox_capacity);
        let token = self.cancellation_token.child_token();
        let handle = ActorHandle::new(tx, token.clone(), ActorMetadata::channel(channel_id));

        let monitor = ChannelMonitor::new(channel_id, self.ctx.clone());
        let actor = ChannelActor::new(
            monitor,
            rx,
            token,
            self.config.poll_interval,
            self.ctx.events.clone(),
        );
        let task = tokio::spawn(actor.run());

        // Replaces the entry of an actor that already exited.
        registry.insert(handle, task);
        info!(channel_id, "Monitoring started");
        true
    }

    /// Stop monitoring a channel and discard its in-progress session.
    ///
    /// Waits for the actor to exit, so a tick that is running completes
    /// before the session is dropped. Returns `false` if the channel was not
    /// registered.
    pub async fn stop(&self, channel_id: &str) -> bool {
        let Some((handle, task)) = self.registry.lock().remove(channel_id) else {
            return false;
        };

        handle.cancel();
        if let Err(e) = task.await {
            warn!(channel_id, error = %e, "Channel actor panicked");
        }

        if let Some(session) = self.ctx.sessions.discard(channel_id) {
            info!(
                channel_id,
                stream_id = %session.stream_id,
                "Discarded in-progress session"
            );
        }
        info!(channel_id, "Monitoring stopped");
        true
    }

    /// Poll a channel immediately and return what the poll did.
    pub async fn check_now(&self, channel_id: &str) -> Result<TickOutcome, SchedulerError> {
        let handle = self.handle(channel_id)?;
        let (reply, rx) = oneshot::channel();
        handle
            .send(ChannelMessage::CheckNow { reply: Some(reply) })
            .await?;
        rx.await.map_err(|_| SchedulerError::NoReply)
    }

    pub async fn channel_state(
        &self,
        channel_id: &str,
    ) -> Result<ChannelActorState, SchedulerError> {
        let handle = self.handle(channel_id)?;
        let (reply, rx) = oneshot::channel();
        handle.send(ChannelMessage::GetState { reply }).await?;
        rx.await.map_err(|_| SchedulerError::NoReply)
    }

    pub fn is_monitoring(&self, channel_id: &str) -> bool {
        self.registry.lock().is_running(channel_id)
    }

    /// Ids of channels with a running actor, sorted.
    pub fn channel_ids(&self) -> Vec<String> {
        let mut registry = self.registry.lock();
        for id in registry.prune_finished() {
            debug!(channel_id = %id, "Removed exited channel actor");
        }
        registry.ids()
    }

    /// Cancel every actor and wait for all of them to exit.
    pub async fn shutdown(&self) {
        self.cancellation_token.cancel();
        let actors = self.registry.lock().drain();
        let count = actors.len();

        for (handle, task) in actors {
            if let Err(e) = task.await {
                warn!(channel_id = %handle.id(), error = %e, "Channel actor panicked");
            }
        }
        info!(count, "Scheduler shut down");
    }

    fn handle(&self, channel_id: &str) -> Result<ActorHandle<ChannelMessage>, SchedulerError> {
        self.registry
            .lock()
            .get(channel_id)
            .cloned()
            .ok_or_else(|| SchedulerError::NotMonitored(channel_id.to_string()))
    }
}
