//! Actor infrastructure for channel monitors.
//!
//! - `ChannelActor`: owns one [`ChannelMonitor`](crate::monitor::ChannelMonitor) and its timer
//! - `ActorHandle`: mailbox sender plus cancellation token
//! - `ActorRegistry`: running actors keyed by channel id

mod channel_actor;
mod handle;
mod messages;
mod registry;

pub use channel_actor::ChannelActor;
pub use handle::{ActorHandle, ActorMetadata, DEFAULT_MAILBOX_CAPACITY, SendError};
pub use messages::{ChannelActorState, ChannelMessage};
pub use registry::ActorRegistry;
