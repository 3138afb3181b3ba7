//! Scoreboard server binary.
//!
//! Wires together configuration, the leaderboard store, and the HTTP API,
//! then serves until asked to stop.
//!
//! # Startup Sequence
//!
//! 1. Load an optional `.env` file
//! 2. Initialize structured logging (tracing)
//! 3. Load configuration from environment variables
//! 4. Open the `SQLite` store and ensure the schema exists
//! 5. Serve HTTP until Ctrl-C or SIGTERM
//! 6. Close the store

mod config;
mod error;

use std::sync::Arc;

use scoreboard_api::{AppState, shutdown_signal, start_server};
use scoreboard_db::{LeaderboardStore, SqliteDb};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::AppError;

/// Application entry point for the Scoreboard server.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the store cannot be
/// opened, or the server fails to bind.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. A missing .env file is normal; real environment variables win.
    let dotenv_path = dotenvy::dotenv().ok();

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!(env_file = ?dotenv_path, "scoreboard-server starting");

    run().await.map_err(|e| {
        tracing::error!(error = %e, "scoreboard-server failed");
        Box::new(e) as Box<dyn std::error::Error>
    })
}

/// Run the server to completion.
async fn run() -> Result<(), AppError> {
    // 3. Load configuration.
    let config = AppConfig::from_env()?;
    info!(
        sqlite_file = %config.sqlite.path.display(),
        host = config.server.host,
        port = config.server.port,
        rate_limit_max = config.rate_limit.max_requests,
        rate_limit_window_secs = config.rate_limit.window.as_secs(),
        "Configuration loaded"
    );

    // 4. Open the store; startup fails without it.
    let db = SqliteDb::connect(&config.sqlite).await?;
    db.run_migrations().await?;
    let entries = LeaderboardStore::new(db.pool()).count().await?;
    info!(entries, "Leaderboard store ready");

    // 5. Serve.
    let state = Arc::new(AppState::with_rate_limit(db.clone(), config.rate_limit));
    let served = start_server(&config.server, state, shutdown_signal()).await;

    // 6. Close the store whether or not serving succeeded.
    db.close().await;
    served?;

    info!("scoreboard-server shutdown complete");
    Ok(())
}
