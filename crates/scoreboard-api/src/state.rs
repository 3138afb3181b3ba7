//! Shared application state for the Scoreboard API server.
//!
//! [`AppState`] holds the leaderboard database handle and the request rate
//! limiter. It is built once at startup, wrapped in [`Arc`], and injected
//! into handlers via Axum's `State` extractor. Tests build it against a
//! temporary database file.

use std::sync::Arc;

use scoreboard_db::SqliteDb;

use crate::rate_limit::{RateLimitConfig, RateLimiter};

/// Shared state for the Axum application.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the leaderboard database.
    pub db: SqliteDb,
    /// Fixed-window limiter applied to every route.
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Create application state with the default rate limit.
    pub fn new(db: SqliteDb) -> Self {
        Self::with_rate_limit(db, RateLimitConfig::default())
    }

    /// Create application state with an explicit rate limit.
    pub fn with_rate_limit(db: SqliteDb, rate_limit: RateLimitConfig) -> Self {
        Self {
            db,
            rate_limiter: Arc::new(RateLimiter::new(rate_limit)),
        }
    }
}
