use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use newswire_core::AppError;
use newswire_core::params::API_BASE_URL;

const DEFAULT_ADDR: &str = "0.0.0.0:8000";

/// Process configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Period of the in-process ingestion task; `None` disables it.
    pub ingest_interval: Option<Duration>,
    /// JSON file overriding the built-in curated table.
    pub top_queries: Option<PathBuf>,
    pub upstream_base_url: String,
}

impl ServerConfig {
    /// Read configuration from environment variables.
    ///
    /// - `NEWSWIRE_ADDR` (defaults to `0.0.0.0:8000`)
    /// - `NEWSWIRE_INGEST_INTERVAL_SECS` (0 or unset disables scheduled ingestion)
    /// - `NEWSWIRE_TOP_QUERIES` (optional path)
    /// - `NEWSWIRE_UPSTREAM_BASE_URL` (defaults to the public news API)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let raw_addr = var("NEWSWIRE_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = raw_addr.trim().parse().map_err(|_| {
            AppError::ConfigError(format!(
                "Invalid NEWSWIRE_ADDR '{raw_addr}': expected host:port"
            ))
        })?;

        let ingest_interval = match var("NEWSWIRE_INGEST_INTERVAL_SECS") {
            None => None,
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AppError::ConfigError(format!(
                        "Invalid NEWSWIRE_INGEST_INTERVAL_SECS '{raw}': must be a whole number of seconds"
                    ))
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
        };

        Ok(Self {
            addr,
            ingest_interval,
            top_queries: var("NEWSWIRE_TOP_QUERIES").map(PathBuf::from),
            upstream_base_url: var("NEWSWIRE_UPSTREAM_BASE_URL")
                .unwrap_or_else(|| API_BASE_URL.to_string()),
        })
    }
}
