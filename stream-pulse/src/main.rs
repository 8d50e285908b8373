use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use helix_client::http::build_client;
use helix_client::{HelixClient, OAuthClient};
use stream_pulse::analytics::AnalyticsReader;
use stream_pulse::api::{ApiServer, ApiServerConfig, AppState};
use stream_pulse::config::AppConfig;
use stream_pulse::credentials::{CredentialRefreshService, CredentialStore};
use stream_pulse::logging::init_logging;
use stream_pulse::monitor::{HelixPlatform, MonitorContext, MonitorEvent, MonitorEventBroadcaster};
use stream_pulse::scheduler::{Scheduler, SchedulerConfig};
use stream_pulse::store::SessionStore;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    let (logging_config, _log_guard) =
        init_logging(&config.log_dir, config.log_format).context("Failed to initialize logging")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        poll_interval_secs = config.poll_interval.as_secs(),
        max_consecutive_failures = config.max_consecutive_failures,
        "Starting stream-pulse"
    );

    let http = build_client(config.http_timeout);
    let mut helix = HelixClient::new(http.clone(), &config.client_id);
    if let Some(base) = &config.helix_base_url {
        helix = helix.with_base_url(base)?;
    }
    let mut oauth = OAuthClient::new(http, &config.client_id, &config.client_secret);
    if let Some(base) = &config.oauth_base_url {
        oauth = oauth.with_base_url(base)?;
    }

    let sessions = Arc::new(SessionStore::new());
    let credentials = Arc::new(CredentialRefreshService::new(
        Arc::new(CredentialStore::new()),
        Arc::new(oauth.clone()),
    ));
    let events = MonitorEventBroadcaster::new();

    let ctx = MonitorContext {
        platform: Arc::new(HelixPlatform::new(helix.clone())),
        sessions: sessions.clone(),
        credentials: credentials.clone(),
        events: events.clone(),
        max_consecutive_failures: config.max_consecutive_failures,
    };
    let scheduler = Arc::new(Scheduler::new(
        ctx,
        SchedulerConfig {
            poll_interval: config.poll_interval,
            ..SchedulerConfig::default()
        },
    ));

    let background = CancellationToken::new();
    logging_config.start_retention_cleanup(background.child_token());
    spawn_event_logger(&events, background.child_token());

    let state = AppState::new(
        scheduler.clone(),
        AnalyticsReader::new(sessions),
        credentials,
        helix,
        oauth,
        config.backend_url.clone(),
    )
    .with_admin_token(config.admin_token.clone())
    .with_logging(logging_config);

    info!("OAuth callback: {}", config.redirect_uri());
    if state.admin_token.is_none() {
        info!("ADMIN_TOKEN not set, administrative routes are disabled");
    }

    let server = ApiServer::new(ApiServerConfig::from(&config), state);
    let server_token = server.cancel_token();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => warn!(error = %e, "Failed to listen for shutdown signal"),
        }
        server_token.cancel();
    });

    let result = server.run().await;

    background.cancel();
    if tokio::time::timeout(SHUTDOWN_TIMEOUT, scheduler.shutdown())
        .await
        .is_err()
    {
        warn!("Shutdown timeout reached, forcing shutdown");
    }

    result.context("API server failed")?;
    info!("stream-pulse stopped");
    Ok(())
}

/// Log every monitor event until `cancel_token` fires.
fn spawn_event_logger(events: &MonitorEventBroadcaster, cancel_token: CancellationToken) {
    let mut receiver = events.subscribe();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    debug!("Monitor event logger shutting down");
                    break;
                }
                result = receiver.recv() => match result {
                    Ok(event @ MonitorEvent::TransientError { .. }) => {
                        warn!(channel_id = %event.channel_id(), "{}", event.description());
                    }
                    Ok(event) => {
                        info!(channel_id = %event.channel_id(), "{}", event.description());
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Monitor event logger lagged");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
    });
}
