//! Session entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Observed state of a channel at the poll that found it newly live.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStart {
    pub stream_id: String,
    pub title: String,
    pub game_name: String,
    /// Start time reported by the platform, not the time of the poll.
    pub start_time: DateTime<Utc>,
    pub viewers: u64,
    pub followers: u64,
    pub subs: u64,
}

/// A broadcast that is still live.
///
/// Owned by the channel's monitor while live. Turning it into a [`Session`]
/// consumes it, so a completed session can no longer receive samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    pub channel_id: String,
    pub stream_id: String,
    pub title: String,
    pub game_name: String,
    pub start_time: DateTime<Utc>,
    pub start_viewers: u64,
    pub peak_viewers: u64,
    pub viewer_sum: u64,
    pub total_viewer_checks: u64,
    pub start_followers: u64,
    pub start_subs: u64,
}

impl ActiveSession {
    /// Start a session; the starting poll counts as the first sample.
    pub fn begin(channel_id: impl Into<String>, start: SessionStart) -> Self {
        Self {
            channel_id: channel_id.into(),
            stream_id: start.stream_id,
            title: start.title,
            game_name: start.game_name,
            start_time: start.start_time,
            start_viewers: start.viewers,
            peak_viewers: start.viewers,
            viewer_sum: start.viewers,
            total_viewer_checks: 1,
            start_followers: start.followers,
            start_subs: start.subs,
        }
    }

    /// Fold one live poll into the running statistics.
    pub fn record_sample(&mut self, viewers: u64) {
        self.total_viewer_checks += 1;
        self.viewer_sum = self.viewer_sum.saturating_add(viewers);
        self.peak_viewers = self.peak_viewers.max(viewers);
    }

    /// Complete the session with the end-of-stream counts.
    pub fn finalize(self, end_time: DateTime<Utc>, end_followers: u64, end_subs: u64) -> Session {
        let avg_viewers = if self.total_viewer_checks == 0 {
            0.0
        } else {
            self.viewer_sum as f64 / self.total_viewer_checks as f64
        };

        Session {
            duration: duration_hours(self.start_time, end_time),
            followers_gained: end_followers as i64 - self.start_followers as i64,
            subs_gained: end_subs as i64 - self.start_subs as i64,
            stream_id: self.stream_id,
            channel_id: self.channel_id,
            title: self.title,
            game_name: self.game_name,
            start_time: self.start_time,
            end_time,
            start_viewers: self.start_viewers,
            peak_viewers: self.peak_viewers,
            viewer_sum: self.viewer_sum,
            total_viewer_checks: self.total_viewer_checks,
            avg_viewers,
            start_followers: self.start_followers,
            end_followers,
            start_subs: self.start_subs,
            end_subs,
        }
    }
}

/// A completed broadcast as served to the extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub stream_id: String,
    pub channel_id: String,
    pub title: String,
    pub game_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Length in hours.
    pub duration: f64,
    pub start_viewers: u64,
    pub peak_viewers: u64,
    pub viewer_sum: u64,
    pub total_viewer_checks: u64,
    pub avg_viewers: f64,
    pub start_followers: u64,
    pub end_followers: u64,
    pub followers_gained: i64,
    pub start_subs: u64,
    pub end_subs: u64,
    pub subs_gained: i64,
}

/// Elapsed hours between two instants, negative if `end` precedes `start`.
pub fn duration_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 3_600_000.0
}
