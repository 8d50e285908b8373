//! stream-pulse library crate.
//!
//! Follows authorized Twitch channels, turns live/offline transitions into
//! session records and serves the results to the browser extension.

pub mod analytics;
pub mod api;
pub mod config;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod scheduler;
pub mod store;

pub use error::{Error, Result};
