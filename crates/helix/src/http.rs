//! Shared `reqwest` client construction.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use tracing::{debug, warn};

pub(crate) const DEFAULT_UA: &str = concat!("stream-pulse/", env!("CARGO_PKG_VERSION"));

pub fn install_rustls_provider() {
    static PROVIDER_INSTALLED: OnceLock<()> = OnceLock::new();
    PROVIDER_INSTALLED.get_or_init(|| {
        if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
            // Safe to ignore: can happen if another crate installed it first.
            debug!(existing_provider = ?e, "rustls CryptoProvider already installed");
        }
    });
}

/// Client builder with the user agent and TLS provider set.
pub fn create_client_builder(request_timeout: Duration) -> ClientBuilder {
    install_rustls_provider();

    let mut builder = Client::builder().user_agent(DEFAULT_UA);
    if request_timeout > Duration::ZERO {
        builder = builder.timeout(request_timeout);
    }
    builder
}

/// Build the shared client, falling back to reqwest defaults on failure.
pub fn build_client(request_timeout: Duration) -> Client {
    create_client_builder(request_timeout)
        .build()
        .unwrap_or_else(|error| {
            warn!(
                error = %error,
                "Failed to create configured HTTP client; falling back to reqwest defaults"
            );
            Client::new()
        })
}
