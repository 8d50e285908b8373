mod entity;

pub use entity::{ActiveSession, Session, SessionStart, duration_hours};
