//! Scripted platform and fixtures for monitor and scheduler tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;

use super::{FetchError, LiveStatus, LiveStream, MonitorContext, MonitorEventBroadcaster, PlatformApi};
use crate::credentials::{
    ChannelCredential, CredentialError, CredentialRefreshService, CredentialStore, RefreshedTokens,
    TokenRefresher,
};
use crate::store::SessionStore;

pub(crate) const CHANNEL: &str = "1001";

pub(crate) fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub(crate) fn live(stream_id: &str, viewers: u64) -> LiveStatus {
    live_since(stream_id, viewers, t0())
}

pub(crate) fn live_since(stream_id: &str, viewers: u64, started_at: DateTime<Utc>) -> LiveStatus {
    LiveStatus::Live(LiveStream {
        stream_id: stream_id.into(),
        title: format!("{stream_id} title"),
        game_name: "Just Chatting".into(),
        started_at,
        viewers,
    })
}

/// Platform that replays queued responses. An empty status queue reports
/// offline and empty count queues report zero.
#[derive(Default)]
pub(crate) struct ScriptedPlatform {
    statuses: Mutex<VecDeque<Result<LiveStatus, FetchError>>>,
    followers: Mutex<VecDeque<Result<u64, FetchError>>>,
    subs: Mutex<VecDeque<Result<u64, FetchError>>>,
    tokens: Mutex<Vec<String>>,
    count_calls: AtomicUsize,
    status_calls: AtomicUsize,
    delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedPlatform {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_status(&self, status: Result<LiveStatus, FetchError>) {
        self.statuses.lock().push_back(status);
    }

    pub(crate) fn push_counts(&self, followers: u64, subs: u64) {
        self.followers.lock().push_back(Ok(followers));
        self.subs.lock().push_back(Ok(subs));
    }

    pub(crate) fn push_follower_error(&self, error: FetchError) {
        self.followers.lock().push_back(Err(error));
    }

    pub(crate) fn push_subs(&self, subs: u64) {
        self.subs.lock().push_back(Ok(subs));
    }

    pub(crate) fn tokens_seen(&self) -> Vec<String> {
        self.tokens.lock().clone()
    }

    /// Number of follower lookups, one per baseline or final count fetch.
    pub(crate) fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Make every status lookup take `delay`.
    pub(crate) fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Highest number of status lookups that were running at once.
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlatformApi for ScriptedPlatform {
    async fn live_status(
        &self,
        _channel_id: &str,
        access_token: &str,
    ) -> Result<LiveStatus, FetchError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().push(access_token.to_string());

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.statuses
            .lock()
            .pop_front()
            .unwrap_or(Ok(LiveStatus::Offline))
    }

    async fn follower_count(&self, _channel_id: &str, _access_token: &str) -> Result<u64, FetchError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.followers.lock().pop_front().unwrap_or(Ok(0))
    }

    async fn subscriber_count(
        &self,
        _channel_id: &str,
        _access_token: &str,
    ) -> Result<u64, FetchError> {
        self.subs.lock().pop_front().unwrap_or(Ok(0))
    }
}

/// Refresher that hands out `fresh-token-<n>`.
#[derive(Default)]
pub(crate) struct FakeRefresher {
    calls: AtomicUsize,
}

impl FakeRefresher {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenRefresher for FakeRefresher {
    async fn refresh(&self, _refresh_token: &str) -> Result<RefreshedTokens, CredentialError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(RefreshedTokens {
            access_token: format!("fresh-token-{n}"),
            refresh_token: None,
        })
    }
}

pub(crate) fn credential(channel_id: &str) -> ChannelCredential {
    ChannelCredential {
        access_token: "initial-token".into(),
        refresh_token: Some("initial-refresh".into()),
        user_id: channel_id.into(),
        login: "streamer".into(),
        display_name: "Streamer".into(),
    }
}

/// Context with [`CHANNEL`] authorized.
pub(crate) fn test_context(
    platform: Arc<ScriptedPlatform>,
    max_consecutive_failures: u32,
) -> (MonitorContext, Arc<FakeRefresher>) {
    let store = Arc::new(CredentialStore::new());
    store.upsert(credential(CHANNEL));
    let refresher = Arc::new(FakeRefresher::default());

    let ctx = MonitorContext {
        platform,
        sessions: Arc::new(SessionStore::new()),
        credentials: Arc::new(CredentialRefreshService::new(store, refresher.clone())),
        events: MonitorEventBroadcaster::new(),
        max_consecutive_failures,
    };
    (ctx, refresher)
}
