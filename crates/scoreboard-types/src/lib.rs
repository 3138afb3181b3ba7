//! Shared type definitions for the Scoreboard service.
//!
//! This crate is the single source of truth for the leaderboard entry and
//! for the rules that turn a raw submission into something the store will
//! accept. Public types flow downstream to `TypeScript` via `ts-rs` for the
//! game client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrapper for store-assigned entry identifiers
//! - [`entry`] -- The persisted entry and its public leaderboard projection
//! - [`submission`] -- Normalization of raw client submissions

pub mod entry;
pub mod ids;
pub mod submission;

// Re-export all public types at crate root for convenience.
pub use entry::{DEFAULT_TOP_N, MAX_PLAYER_CHARS, MAX_SCORE, RankedScore, ScoreEntry};
pub use ids::EntryId;
pub use submission::{Rejection, Submission, normalize_player, normalize_score};
