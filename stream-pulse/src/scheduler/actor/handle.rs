//! Actor handle for message passing.

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Default mailbox capacity for actors.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 32;

/// Default timeout for send operations when mailbox is full.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// The actor has stopped and is no longer accepting messages.
    ActorStopped,
    /// The mailbox stayed full for the whole send timeout.
    Timeout,
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::ActorStopped => write!(f, "Actor has stopped"),
            SendError::Timeout => write!(f, "Send operation timed out"),
        }
    }
}

impl std::error::Error for SendError {}

#[derive(Debug, Clone)]
pub struct ActorMetadata {
    /// Channel id the actor monitors.
    pub id: String,
}

impl ActorMetadata {
    pub fn channel(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A handle to an actor for sending messages.
pub struct ActorHandle<M> {
    sender: mpsc::Sender<M>,
    cancellation_token: CancellationToken,
    pub metadata: ActorMetadata,
}

impl<M> ActorHandle<M> {
    pub fn new(
        sender: mpsc::Sender<M>,
        cancellation_token: CancellationToken,
        metadata: ActorMetadata,
    ) -> Self {
        Self {
            sender,
            cancellation_token,
            metadata,
        }
    }

    /// Send a message, waiting up to [`DEFAULT_SEND_TIMEOUT`] for mailbox space.
    pub async fn send(&self, msg: M) -> Result<(), SendError> {
        self.send_with_timeout(msg, DEFAULT_SEND_TIMEOUT).await
    }

    pub async fn send_with_timeout(&self, msg: M, timeout: Duration) -> Result<(), SendError> {
        match self.sender.try_send(msg) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(msg)) => {
                match tokio::time::timeout(timeout, self.sender.reserve()).await {
                    Ok(Ok(permit)) => {
                        permit.send(msg);
                        Ok(())
                    }
                    Ok(Err(_)) => Err(SendError::ActorStopped),
                    Err(_) => Err(SendError::Timeout),
                }
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(SendError::ActorStopped),
        }
    }

    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }
}

impl<M> Clone for ActorHandle<M> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            cancellation_token: self.cancellation_token.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

impl<M> fmt::Debug for ActorHandle<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorHandle")
            .field("metadata", &self.metadata)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
