//! In-memory stores.

mod sessions;

pub use sessions::{SessionEnd, SessionStore};
