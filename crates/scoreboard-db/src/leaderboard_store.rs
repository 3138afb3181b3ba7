//! Leaderboard store: append scores and read the top of the table.
//!
//! The `leaderboard` table is append-only. Ranking is pushed entirely into
//! `SQLite`: the composite index on `(score DESC, created_at ASC)` answers
//! the top-N query in index order, so nothing is sorted in memory.
//!
//! Writes are single statements and need no explicit transaction. `SQLite`
//! serializes writers internally; in WAL mode readers see the last committed
//! state without waiting on an in-flight write.

use scoreboard_types::{EntryId, ScoreEntry};
use sqlx::SqlitePool;

use crate::error::DbError;

/// Operations on the `leaderboard` table.
pub struct LeaderboardStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> LeaderboardStore<'a> {
    /// Create a new leaderboard store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a score and return the identifier the store assigned to it.
    ///
    /// `created_at` is filled in by the column default with the current
    /// epoch second.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ConstraintViolation`] if the row breaks a table
    /// constraint (for example a negative score).
    /// Returns [`DbError::Sqlite`] if the write fails for any other reason.
    pub async fn append(&self, player: &str, score: i64) -> Result<EntryId, DbError> {
        let id = sqlx::query_scalar::<_, i64>(
            r"INSERT INTO leaderboard (player, score) VALUES (?1, ?2) RETURNING id",
        )
        .bind(player)
        .bind(score)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::from_write)?;

        tracing::debug!(id, player, score, "Appended leaderboard entry");
        Ok(EntryId(id))
    }

    /// Return up to `n` entries in rank order.
    ///
    /// Ordered by score descending, then by `created_at` ascending so the
    /// earlier submission wins a tie, then by id so entries from the same
    /// second keep their insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn top_n(&self, n: u32) -> Result<Vec<ScoreEntry>, DbError> {
        let rows = sqlx::query_as::<_, ScoreRow>(
            r"SELECT id, player, score, created_at
              FROM leaderboard
              ORDER BY score DESC, created_at ASC, id ASC
              LIMIT ?1",
        )
        .bind(i64::from(n))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ScoreEntry::from).collect())
    }

    /// Count all stored entries.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn count(&self) -> Result<i64, DbError> {
        let count = sqlx::query_scalar::<_, i64>(r"SELECT COUNT(*) FROM leaderboard")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Whether the store is reachable.
    ///
    /// Returns `false` once the pool is closed or if a trivial round-trip
    /// fails. Never errors.
    pub async fn health_check(&self) -> bool {
        if self.pool.is_closed() {
            return false;
        }
        match sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(self.pool)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Leaderboard health check failed");
                false
            }
        }
    }
}

/// A row from the `leaderboard` table.
///
/// Uses runtime types rather than compile-time checked types to
/// avoid requiring a live database during builds.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScoreRow {
    /// Auto-incremented entry ID.
    pub id: i64,
    /// Player label.
    pub player: String,
    /// Non-negative score.
    pub score: i64,
    /// Insertion time in epoch seconds.
    pub created_at: i64,
}

impl From<ScoreRow> for ScoreEntry {
    fn from(row: ScoreRow) -> Self {
        Self {
            id: EntryId(row.id),
            player: row.player,
            score: row.score,
            created_at: row.created_at,
        }
    }
}
