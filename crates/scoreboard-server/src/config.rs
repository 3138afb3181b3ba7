//! Configuration for the Scoreboard server.
//!
//! All configuration is read once at startup from environment variables
//! (after an optional `.env` file is loaded). There is no hot reload.

use std::path::PathBuf;
use std::time::Duration;

use scoreboard_api::rate_limit::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW_SECS};
use scoreboard_api::server::DEFAULT_PORT;
use scoreboard_api::{RateLimitConfig, ServerConfig};
use scoreboard_db::{
    DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_DB_PATH, DEFAULT_MAX_CONNECTIONS, SqliteConfig,
};

use crate::error::AppError;

/// Complete server configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where the leaderboard database lives.
    pub sqlite: SqliteConfig,
    /// Listen address.
    pub server: ServerConfig,
    /// Per-client request budget.
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `SQLITE_FILE` -- database file path (default `./leaderboard.db`)
    /// - `SQLITE_MAX_CONNECTIONS` -- pool size (default 5)
    /// - `SQLITE_BUSY_TIMEOUT_MS` -- wait on a locked database (default 5000)
    /// - `HOST` -- listen address (default `0.0.0.0`)
    /// - `PORT` -- listen port (default 3000)
    /// - `RATE_LIMIT_MAX` -- requests per window per client, 0 disables (default 120)
    /// - `RATE_LIMIT_WINDOW_SECS` -- window length in seconds (default 60)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup("SQLITE_FILE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_owned());

        let host = lookup("HOST")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| ServerConfig::default().host);

        let max_connections: u32 =
            parse_or(&lookup, "SQLITE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(AppError::Config(String::from(
                "invalid SQLITE_MAX_CONNECTIONS: must be at least 1",
            )));
        }
        let busy_timeout_ms: u64 =
            parse_or(&lookup, "SQLITE_BUSY_TIMEOUT_MS", DEFAULT_BUSY_TIMEOUT_MS)?;

        let port: u16 = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let max_requests: u32 = parse_or(&lookup, "RATE_LIMIT_MAX", DEFAULT_MAX_REQUESTS)?;
        let window_secs: u64 = parse_or(&lookup, "RATE_LIMIT_WINDOW_SECS", DEFAULT_WINDOW_SECS)?;
        if window_secs == 0 {
            return Err(AppError::Config(String::from(
                "invalid RATE_LIMIT_WINDOW_SECS: must be at least 1",
            )));
        }

        Ok(Self {
            sqlite: SqliteConfig::new(PathBuf::from(path))
                .with_max_connections(max_connections)
                .with_busy_timeout(Duration::from_millis(busy_timeout_ms)),
            server: ServerConfig { host, port },
            rate_limit: RateLimitConfig::new(max_requests, Duration::from_secs(window_secs)),
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset or blank.
fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("invalid {name}: {e}"))),
        _ => Ok(default),
    }
}
