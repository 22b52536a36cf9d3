//! Console configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STORAGE_DIR: &str = ".barberdesk";
pub const DEFAULT_MOCK_LATENCY_MS: u64 = 300;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
}

/// Which auth gateway the composition root wires in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayKind {
    Mock,
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub gateway: GatewayKind,
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub storage_dir: PathBuf,
    pub mock_latency: Duration,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayKind::Mock,
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            mock_latency: Duration::from_millis(DEFAULT_MOCK_LATENCY_MS),
        }
    }
}

impl ConsoleConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `BARBERDESK_GATEWAY`: `mock` (default) or `http`
    /// - `BARBERDESK_API_BASE_URL`: default `http://localhost:3001/api`
    /// - `BARBERDESK_REQUEST_TIMEOUT_SECS`: default 10
    /// - `BARBERDESK_STORAGE_DIR`: default `.barberdesk`
    /// - `BARBERDESK_MOCK_LATENCY_MS`: default 300
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for an unknown gateway kind.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gateway = parse_gateway(std::env::var("BARBERDESK_GATEWAY").ok().as_deref())?;
        let api_base_url = std::env::var("BARBERDESK_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let storage_dir = std::env::var("BARBERDESK_STORAGE_DIR")
            .map_or_else(|_| PathBuf::from(DEFAULT_STORAGE_DIR), PathBuf::from);

        Ok(Self {
            gateway,
            api_base_url,
            request_timeout: Duration::from_secs(env_parse_u64(
                "BARBERDESK_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            storage_dir,
            mock_latency: Duration::from_millis(env_parse_u64("BARBERDESK_MOCK_LATENCY_MS", DEFAULT_MOCK_LATENCY_MS)),
        })
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_gateway(raw: Option<&str>) -> Result<GatewayKind, ConfigError> {
    match raw.map_or("mock", str::trim) {
        "mock" => Ok(GatewayKind::Mock),
        "http" => Ok(GatewayKind::Http),
        other => Err(ConfigError::Parse(format!(
            "unknown BARBERDESK_GATEWAY '{other}' (expected 'mock' or 'http')"
        ))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
