//! HTTP API server for the Scoreboard service.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`GET /api/scores`** -- the top 10 entries, best first
//! - **`POST /api/scores`** -- submit `{player, score}`
//! - **`GET /api/health`** -- liveness probe
//!
//! # Architecture
//!
//! Handlers are a thin adapter over [`scoreboard_db::LeaderboardStore`].
//! Submissions are normalized by [`scoreboard_types::Submission`] before
//! they reach the store; rejections become `400 {"error": ...}` and never
//! touch the database. Every route sits behind a per-client fixed-window
//! rate limiter.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use router::build_router;
pub use server::{ServerConfig, ServerError, shutdown_signal, start_server};
pub use state::AppState;
