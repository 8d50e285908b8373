//! Domain layer for stream-pulse.
//!
//! Session records and the per-channel live state they are built from.

pub mod channel;
pub mod session;

pub use channel::ChannelState;
pub use session::{ActiveSession, Session, SessionStart};
