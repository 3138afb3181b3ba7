//! The leaderboard entry and its public projection.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::EntryId;

/// Upper bound accepted for a submitted score.
///
/// Enforced at submission time only; the store itself only requires
/// `score >= 0`. Held as `u32` so it widens losslessly to both `f64` and
/// `i64`.
pub const MAX_SCORE: u32 = 1_000_000_000;

/// Maximum player label length, in characters.
pub const MAX_PLAYER_CHARS: usize = 3;

/// Number of entries returned by the leaderboard endpoint.
pub const DEFAULT_TOP_N: u32 = 10;

/// A single persisted score record.
///
/// Entries are created once by the store and never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ScoreEntry {
    /// Store-assigned identifier, strictly increasing in insertion order.
    pub id: EntryId,
    /// Normalized player label (1 to 3 characters).
    pub player: String,
    /// Non-negative integer score.
    pub score: i64,
    /// Insertion time in seconds since the Unix epoch. Tie-breaker only.
    pub created_at: i64,
}

impl ScoreEntry {
    /// Whether `self` ranks at or above `other` on the leaderboard.
    ///
    /// Higher score wins; on equal scores the earlier submission wins.
    pub const fn ranks_before(&self, other: &Self) -> bool {
        self.score > other.score
            || (self.score == other.score && self.created_at <= other.created_at)
    }

    /// Project the entry onto the wire shape served by `GET /api/scores`.
    pub fn to_ranked(&self) -> RankedScore {
        RankedScore {
            player: self.player.clone(),
            score: self.score,
            created_at: self.created_at,
        }
    }
}

/// One row of the public leaderboard: `{player, score, created_at}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RankedScore {
    /// Player label.
    pub player: String,
    /// Integer score.
    pub score: i64,
    /// Insertion time in seconds since the Unix epoch.
    pub created_at: i64,
}
