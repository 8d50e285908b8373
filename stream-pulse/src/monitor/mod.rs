//! Channel monitoring.
//!
//! - [`PlatformApi`]: the live-status and count lookups a monitor needs
//! - [`ChannelMonitor`]: the per-channel OFFLINE/LIVE state machine
//! - [`MonitorEventBroadcaster`]: lifecycle events for other components

mod channel;
mod events;
mod source;

pub use channel::{ChannelMonitor, MonitorContext, StopReason, TickOutcome};
pub use events::{MonitorEvent, MonitorEventBroadcaster};
pub use source::{FetchError, HelixPlatform, LiveStatus, LiveStream, PlatformApi};

#[cfg(test)]
pub(crate) mod test_support;
