//! Per-channel live state machine.
//!
//! A [`ChannelMonitor`] polls the platform once per tick and moves its
//! channel between OFFLINE and LIVE:
//!
//! - OFFLINE, platform live: begin a session with baseline counts
//! - LIVE, same stream id: add a viewer sample
//! - LIVE, different stream id: complete the old session and begin the new one
//! - LIVE, platform offline: complete the session with final counts
//!
//! Every lookup a tick needs is made before the store is touched, and the
//! result is committed with one store call. A failed lookup therefore leaves
//! the channel exactly as it was and the next tick retries from there.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::credentials::CredentialRefreshService;
use crate::domain::{ActiveSession, ChannelState, Session};
use crate::store::{SessionEnd, SessionStore};

use super::events::{MonitorEvent, MonitorEventBroadcaster};
use super::source::{FetchError, LiveStatus, PlatformApi};

/// Shared dependencies handed to every channel monitor.
#[derive(Clone)]
pub struct MonitorContext {
    pub platform: Arc<dyn PlatformApi>,
    pub sessions: Arc<SessionStore>,
    pub credentials: Arc<CredentialRefreshService>,
    pub events: MonitorEventBroadcaster,
    /// Consecutive failed ticks before a monitor gives up; 0 never gives up.
    pub max_consecutive_failures: u32,
}

/// Why a channel's monitor exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StopReason {
    /// Stopped through the scheduler.
    Cancelled,
    /// The channel's credential is gone.
    CredentialRemoved,
    /// Too many consecutive ticks failed.
    TooManyFailures { consecutive: u32 },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "cancelled"),
            Self::CredentialRemoved => write!(f, "credential removed"),
            Self::TooManyFailures { consecutive } => {
                write!(f, "{consecutive} consecutive failures")
            }
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Offline before and after.
    Offline,
    Started(ActiveSession),
    Sampled(ActiveSession),
    Ended(Session),
    RolledOver {
        finished: Session,
        started: ActiveSession,
    },
    /// The tick was skipped; the channel state is unchanged.
    Failed { consecutive: u32 },
    /// The monitor must exit.
    Stop(StopReason),
}

impl TickOutcome {
    /// Short name of the outcome, as reported by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Started(_) => "started",
            Self::Sampled(_) => "sampled",
            Self::Ended(_) => "ended",
            Self::RolledOver { .. } => "rolled_over",
            Self::Failed { .. } => "failed",
            Self::Stop(_) => "stopped",
        }
    }
}

#[derive(Debug, Error)]
enum TickError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Store(#[from] crate::Error),
}

pub struct ChannelMonitor {
    channel_id: String,
    ctx: MonitorContext,
    consecutive_failures: u32,
}

impl ChannelMonitor {
    pub fn new(channel_id: impl Into<String>, ctx: MonitorContext) -> Self {
        Self {
            channel_id: channel_id.into(),
            ctx,
            consecutive_failures: 0,
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Current state as recorded in the session store.
    pub fn state(&self) -> ChannelState {
        match self.ctx.sessions.active(&self.channel_id) {
            Some(session) => ChannelState::Live {
                stream_id: session.stream_id,
            },
            None => ChannelState::Offline,
        }
    }

    /// Drop the channel's in-progress session, if there is one.
    pub fn discard_session(&self) -> Option<ActiveSession> {
        self.ctx.sessions.discard(&self.channel_id)
    }

    pub async fn tick(&mut self) -> TickOutcome {
        self.tick_at(Utc::now()).await
    }

    /// Run one poll, using `now` as the end time of a session that ends.
    pub async fn tick_at(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let Some(access_token) = self.ctx.credentials.store().access_token(&self.channel_id)
        else {
            info!(channel_id = %self.channel_id, "No credential for channel, stopping monitor");
            return TickOutcome::Stop(StopReason::CredentialRemoved);
        };

        match self.poll(&access_token, now).await {
            Ok(outcome) => {
                if self.consecutive_failures > 0 {
                    debug!(
                        channel_id = %self.channel_id,
                        failures = self.consecutive_failures,
                        "Channel poll recovered"
                    );
                }
                self.consecutive_failures = 0;
                outcome
            }
            Err(TickError::Fetch(e)) => {
                if e.is_auth_expired() {
                    // The refreshed token is used from the next tick on.
                    if let Err(refresh_error) =
                        self.ctx.credentials.refresh(&self.channel_id).await
                    {
                        warn!(
                            channel_id = %self.channel_id,
                            error = %refresh_error,
                            requires_reauth = refresh_error.requires_reauth(),
                            "Access token rejected and could not be refreshed"
                        );
                    }
                }
                self.record_failure(e.to_string(), now)
            }
            Err(TickError::Store(e)) => {
                error!(channel_id = %self.channel_id, error = %e, "Session store rejected tick");
                self.record_failure(e.to_string(), now)
            }
        }
    }

    async fn poll(&self, access_token: &str, now: DateTime<Utc>) -> Result<TickOutcome, TickError> {
        let channel_id = self.channel_id.as_str();
        let sessions = &self.ctx.sessions;

        let status = self
            .ctx
            .platform
            .live_status(channel_id, access_token)
            .await?;

        let outcome = match (sessions.active(channel_id), status) {
            (None, LiveStatus::Offline) => TickOutcome::Offline,

            (None, LiveStatus::Live(stream)) => {
                let (followers, subs) = self.counts(access_token).await?;
                let started = sessions.begin(channel_id, stream.session_start(followers, subs))?;

                info!(
                    channel_id,
                    stream_id = %started.stream_id,
                    title = %started.title,
                    viewers = started.start_viewers,
                    "Channel went live"
                );
                self.publish_live(&started, now);
                TickOutcome::Started(started)
            }

            (Some(current), LiveStatus::Live(stream)) if current.stream_id == stream.stream_id => {
                let updated = sessions.update(channel_id, stream.viewers)?;
                debug!(
                    channel_id,
                    viewers = stream.viewers,
                    peak = updated.peak_viewers,
                    checks = updated.total_viewer_checks,
                    "Viewer sample recorded"
                );
                TickOutcome::Sampled(updated)
            }

            (Some(current), LiveStatus::Live(stream)) => {
                let (followers, subs) = self.counts(access_token).await?;
                let end_time = if stream.started_at > current.start_time {
                    stream.started_at
                } else {
                    now
                };
                let (finished, started) = sessions.rollover(
                    channel_id,
                    SessionEnd {
                        end_time,
                        followers,
                        subs,
                    },
                    stream.session_start(followers, subs),
                )?;

                info!(
                    channel_id,
                    ended = %finished.stream_id,
                    started = %started.stream_id,
                    "Stream restarted between polls"
                );
                self.publish_offline(&finished, now);
                self.publish_live(&started, now);
                TickOutcome::RolledOver { finished, started }
            }

            (Some(_), LiveStatus::Offline) => {
                let (followers, subs) = self.counts(access_token).await?;
                let finished = sessions.finalize(
                    channel_id,
                    SessionEnd {
                        end_time: now,
                        followers,
                        subs,
                    },
                )?;

                info!(
                    channel_id,
                    stream_id = %finished.stream_id,
                    duration_hours = finished.duration,
                    followers_gained = finished.followers_gained,
                    "Channel went offline"
                );
                self.publish_offline(&finished, now);
                TickOutcome::Ended(finished)
            }
        };

        Ok(outcome)
    }

    async fn counts(&self, access_token: &str) -> Result<(u64, u64), FetchError> {
        let platform = &self.ctx.platform;
        tokio::try_join!(
            platform.follower_count(&self.channel_id, access_token),
            platform.subscriber_count(&self.channel_id, access_token),
        )
    }

    fn record_failure(&mut self, message: String, now: DateTime<Utc>) -> TickOutcome {
        self.consecutive_failures += 1;
        let consecutive = self.consecutive_failures;

        warn!(
            channel_id = %self.channel_id,
            error = %message,
            consecutive,
            "Channel poll failed"
        );
        self.ctx.events.publish(MonitorEvent::TransientError {
            channel_id: self.channel_id.clone(),
            error_message: message,
            consecutive_errors: consecutive,
            timestamp: now,
        });

        let max = self.ctx.max_consecutive_failures;
        if max > 0 && consecutive >= max {
            TickOutcome::Stop(StopReason::TooManyFailures { consecutive })
        } else {
            TickOutcome::Failed { consecutive }
        }
    }

    fn publish_live(&self, session: &ActiveSession, now: DateTime<Utc>) {
        self.ctx.events.publish(MonitorEvent::ChannelLive {
            channel_id: session.channel_id.clone(),
            stream_id: session.stream_id.clone(),
            title: session.title.clone(),
            game_name: session.game_name.clone(),
            viewers: session.start_viewers,
            timestamp: now,
        });
    }

    fn publish_offline(&self, session: &Session, now: DateTime<Utc>) {
        self.ctx.events.publish(MonitorEvent::ChannelOffline {
            channel_id: session.channel_id.clone(),
            stream_id: session.stream_id.clone(),
            duration_hours: session.duration,
            followers_gained: session.followers_gained,
            timestamp: now,
        });
    }
}
