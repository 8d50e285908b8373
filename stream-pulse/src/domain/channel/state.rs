//! Channel live state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Live state of a monitored channel as last observed by its monitor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelState {
    /// No session is in progress.
    #[default]
    Offline,
    /// A session for `stream_id` is in progress.
    Live {
        #[serde(rename = "streamId")]
        stream_id: String,
    },
}

impl ChannelState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offline => "OFFLINE",
            Self::Live { .. } => "LIVE",
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live { .. })
    }

    /// Stream id of the in-progress session, if any.
    pub fn stream_id(&self) -> Option<&str> {
        match self {
            Self::Offline => None,
            Self::Live { stream_id } => Some(stream_id),
        }
    }
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_offline() {
        assert_eq!(ChannelState::default(), ChannelState::Offline);
        assert!(!ChannelState::Offline.is_live());
        assert_eq!(ChannelState::Offline.stream_id(), None);
    }

    #[test]
    fn test_live_serialization() {
        let state = ChannelState::Live {
            stream_id: "s1".into(),
        };
        assert_eq!(state.to_string(), "LIVE");
        assert_eq!(state.stream_id(), Some("s1"));

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["state"], "LIVE");
        assert_eq!(json["streamId"], "s1");
    }
}
