//! Data layer for the Scoreboard service (`SQLite`).
//!
//! A single embedded `SQLite` file holds the append-only `leaderboard`
//! table. This crate opens it with crash-safe, low-latency durability
//! settings, ensures the schema exists, and exposes the three store
//! operations the HTTP layer needs.
//!
//! # Architecture
//!
//! ```text
//! POST /api/scores --> LeaderboardStore::append  --+
//!                                                  +--> SqliteDb (WAL, synchronous=NORMAL)
//! GET  /api/scores --> LeaderboardStore::top_n   --+        |
//! GET  /api/health --> LeaderboardStore::health_check       +-- leaderboard
//!                                                           +-- idx_leaderboard_score
//! ```
//!
//! # Modules
//!
//! - [`sqlite`] -- Connection pool, durability settings, and migrations
//! - [`leaderboard_store`] -- Append, top-N, and health queries
//! - [`error`] -- Shared error types

pub mod error;
pub mod leaderboard_store;
pub mod sqlite;

// Re-export primary types for convenience.
pub use error::DbError;
pub use leaderboard_store::{LeaderboardStore, ScoreRow};
pub use sqlite::{
    DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_DB_PATH, DEFAULT_MAX_CONNECTIONS, SqliteConfig, SqliteDb,
};
