//! Process configuration from environment variables.
//!
//! `.env` is loaded by `main` through `dotenvy` before [`AppConfig::from_env`]
//! runs, so both sources are read the same way.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::logging::LogFormat;
use crate::{Error, Result};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 120;
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 10;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Public base URL of this server, used for the OAuth redirect.
    pub backend_url: String,
    pub bind_address: String,
    pub port: u16,
    pub poll_interval: Duration,
    pub max_consecutive_failures: u32,
    pub http_timeout: Duration,
    pub log_dir: PathBuf,
    pub log_format: LogFormat,
    pub helix_base_url: Option<String>,
    pub oauth_base_url: Option<String>,
    /// Bearer token for the administrative routes; they are disabled without it.
    pub admin_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let required = |name: &str| {
            get(name).ok_or_else(|| Error::config(format!("{name} must be set")))
        };

        fn parse<T: FromStr>(name: &str, value: Option<String>, default: T) -> Result<T> {
            match value {
                Some(raw) => raw
                    .parse()
                    .map_err(|_| Error::config(format!("{name} has an invalid value: {raw}"))),
                None => Ok(default),
            }
        }

        let port = parse("PORT", get("PORT"), DEFAULT_PORT)?;
        let poll_interval_secs = parse(
            "POLL_INTERVAL_SECS",
            get("POLL_INTERVAL_SECS"),
            DEFAULT_POLL_INTERVAL_SECS,
        )?;
        if poll_interval_secs == 0 {
            return Err(Error::config("POLL_INTERVAL_SECS must be greater than 0"));
        }

        let backend_url = get("BACKEND_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client_id: required("TWITCH_CLIENT_ID")?,
            client_secret: required("TWITCH_CLIENT_SECRET")?,
            backend_url,
            bind_address: get("API_BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.into()),
            port,
            poll_interval: Duration::from_secs(poll_interval_secs),
            max_consecutive_failures: parse(
                "MAX_CONSECUTIVE_FAILURES",
                get("MAX_CONSECUTIVE_FAILURES"),
                DEFAULT_MAX_CONSECUTIVE_FAILURES,
            )?,
            http_timeout: Duration::from_secs(parse(
                "HTTP_TIMEOUT_SECS",
                get("HTTP_TIMEOUT_SECS"),
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            log_dir: get("LOG_DIR")
                .unwrap_or_else(|| DEFAULT_LOG_DIR.into())
                .into(),
            log_format: get("LOG_FORMAT")
                .map(|v| v.parse::<LogFormat>())
                .transpose()?
                .unwrap_or_default(),
            helix_base_url: get("HELIX_BASE_URL"),
            oauth_base_url: get("OAUTH_BASE_URL"),
            admin_token: get("ADMIN_TOKEN"),
        })
    }

    /// Redirect URI registered with the platform for the OAuth callback.
    pub fn redirect_uri(&self) -> String {
        format!("{}/auth/callback", self.backend_url)
    }
}
