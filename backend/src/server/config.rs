//! Server configuration read from the environment.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use reqwest::Url;

use crate::domain::DEFAULT_TREND_WINDOW_MONTHS;
use crate::outbound::geolocation::DEFAULT_LOOKUP_TIMEOUT;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_HOME_STATE: &str = "Gujarat";
const DEFAULT_GEOLOCATION_URL: &str = "http://ip-api.com/";

/// A configuration value that could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("invalid value for {key}: {message}")]
pub struct ConfigError {
    /// Environment variable that failed to parse.
    pub key: &'static str,
    /// Parse failure description.
    pub message: String,
}

impl ConfigError {
    fn new(key: &'static str, message: impl Into<String>) -> Self {
        Self {
            key,
            message: message.into(),
        }
    }
}

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection URL; absent means the in-memory sample store.
    pub database_url: Option<String>,
    /// State used when a districts listing does not name one.
    pub home_state: String,
    /// Trailing window for trend series, in months.
    pub trend_window_months: u32,
    /// Base URL of the IP-geolocation provider.
    pub geolocation_endpoint: Url,
    /// Deadline for IP-geolocation lookups.
    pub geolocation_timeout: Duration,
}

impl ServerConfig {
    /// Read configuration from the environment, applying defaults for unset
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a set variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned())
            .parse()
            .map_err(|err| ConfigError::new("BIND_ADDR", format!("{err}")))?;

        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());

        let home_state =
            env::var("HOME_STATE").unwrap_or_else(|_| DEFAULT_HOME_STATE.to_owned());

        let trend_window_months = match env::var("TREND_WINDOW_MONTHS") {
            Ok(raw) => raw
                .parse()
                .map_err(|err| ConfigError::new("TREND_WINDOW_MONTHS", format!("{err}")))?,
            Err(_) => DEFAULT_TREND_WINDOW_MONTHS,
        };

        let geolocation_endpoint = env::var("GEOLOCATION_URL")
            .unwrap_or_else(|_| DEFAULT_GEOLOCATION_URL.to_owned())
            .parse()
            .map_err(|err| ConfigError::new("GEOLOCATION_URL", format!("{err}")))?;

        let geolocation_timeout = match env::var("GEOLOCATION_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|err| {
                    ConfigError::new("GEOLOCATION_TIMEOUT_SECS", format!("{err}"))
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => DEFAULT_LOOKUP_TIMEOUT,
        };

        Ok(Self {
            bind_addr,
            database_url,
            home_state,
            trend_window_months,
            geolocation_endpoint,
            geolocation_timeout,
        })
    }
}
