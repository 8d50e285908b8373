//! Scheduler for per-channel monitors.
//!
//! The [`Scheduler`] spawns one `ChannelActor` per authorized channel and
//! keeps track of it until the channel is stopped or the actor exits.

pub mod actor;
mod service;

pub use actor::{ActorHandle, ActorMetadata, ChannelActorState, ChannelMessage, SendError};
pub use service::{Scheduler, SchedulerConfig, SchedulerError};
