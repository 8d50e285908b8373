//! API server setup and configuration.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::Request;
use helix_client::{HelixClient, OAuthClient};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::analytics::AnalyticsReader;
use crate::api::routes;
use crate::config::AppConfig;
use crate::credentials::{CredentialRefreshService, CredentialStore};
use crate::error::{Error, Result};
use crate::logging::LoggingConfig;
use crate::scheduler::Scheduler;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Server bind address
    pub bind_address: String,
    /// Server port
    pub port: u16,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_address: crate::config::DEFAULT_BIND_ADDRESS.to_string(),
            port: crate::config::DEFAULT_PORT,
        }
    }
}

impl From<&AppConfig> for ApiServerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            bind_address: config.bind_address.clone(),
            port: config.port,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server start time for uptime calculation
    pub start_time: Instant,
    pub scheduler: Arc<Scheduler>,
    pub analytics: AnalyticsReader,
    /// Token storage plus single-flight refresh
    pub credentials: Arc<CredentialRefreshService>,
    pub helix: HelixClient,
    pub oauth: OAuthClient,
    /// Public base URL, without a trailing slash
    pub backend_url: String,
    /// Bearer token for administrative routes
    pub admin_token: Option<String>,
    /// Logging configuration for dynamic log level changes
    pub logging_config: Option<Arc<LoggingConfig>>,
}

impl AppState {
    pub fn new(
        scheduler: Arc<Scheduler>,
        analytics: AnalyticsReader,
        credentials: Arc<CredentialRefreshService>,
        helix: HelixClient,
        oauth: OAuthClient,
        backend_url: impl Into<String>,
    ) -> Self {
        Self {
            start_time: Instant::now(),
            scheduler,
            analytics,
            credentials,
            helix,
            oauth,
            backend_url: backend_url.into(),
            admin_token: None,
            logging_config: None,
        }
    }

    pub fn with_admin_token(mut self, token: Option<String>) -> Self {
        self.admin_token = token;
        self
    }

    pub fn with_logging(mut self, logging_config: Arc<LoggingConfig>) -> Self {
        self.logging_config = Some(logging_config);
        self
    }

    pub fn credential_store(&self) -> &Arc<CredentialStore> {
        self.credentials.store()
    }

    /// OAuth redirect target registered with the platform.
    pub fn redirect_uri(&self) -> String {
        format!("{}/auth/callback", self.backend_url)
    }
}

fn is_health_path(path: &str) -> bool {
    path == "/" || path == "/health"
}

/// API server.
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
    cancel_token: CancellationToken,
}

impl ApiServer {
    pub fn new(config: ApiServerConfig, state: AppState) -> Self {
        Self {
            config,
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Get the cancellation token for graceful shutdown.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn build_router(&self) -> Router {
        // The extension calls from its own origin.
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        routes::create_router(self.state.clone()).layer(cors).layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request| {
                    if is_health_path(req.uri().path()) {
                        Span::none()
                    } else {
                        let mut make_span =
                            tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO);
                        use tower_http::trace::MakeSpan;
                        make_span.make_span(req)
                    }
                })
                .on_request(|req: &Request, span: &Span| {
                    if span.is_disabled() {
                        return;
                    }
                    let mut on_request =
                        tower_http::trace::DefaultOnRequest::new().level(tracing::Level::INFO);
                    use tower_http::trace::OnRequest;
                    on_request.on_request(req, span);
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        if span.is_disabled() {
                            return;
                        }
                        let on_response =
                            tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO);
                        use tower_http::trace::OnResponse;
                        on_response.on_response(res, latency, span);
                    },
                )
                .on_failure(
                    |class: tower_http::classify::ServerErrorsFailureClass,
                     latency: Duration,
                     span: &Span| {
                        if span.is_disabled() {
                            return;
                        }
                        let mut on_failure =
                            tower_http::trace::DefaultOnFailure::new().level(tracing::Level::ERROR);
                        use tower_http::trace::OnFailure;
                        on_failure.on_failure(class, latency, span);
                    },
                ),
        )
    }

    /// Start the server and serve until [`ApiServer::shutdown`] is called.
    pub async fn run(&self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.bind_address, self.config.port)
            .parse()
            .map_err(|e| Error::ApiError(format!("Invalid address: {e}")))?;

        let router = self.build_router();
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("API server listening on http://{}", addr);

        let cancel_token = self.cancel_token.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                tracing::info!("API server shutting down...");
            })
            .await
            .map_err(|e| Error::ApiError(format!("Server error: {e}")))?;

        Ok(())
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
