//! `SQLite` connection pool and durability settings.
//!
//! The leaderboard lives in a single embedded `SQLite` file. Every pooled
//! connection runs in WAL journal mode with `synchronous = NORMAL`: writes
//! are journaled and crash-safe, readers never block on the writer, and
//! only the most recent commit can be lost on a hard power failure.
//!
//! Uses [`sqlx`] with runtime query construction (not compile-time checked)
//! to avoid requiring a live database at build time. All queries are
//! parameterized to prevent SQL injection.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::error::DbError;

/// Default database file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "./leaderboard.db";

/// Default maximum number of connections in the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default time a writer waits on a locked database before failing.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Default time to wait for a free pooled connection.
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Configuration for the `SQLite` connection pool.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path of the database file. Created if missing.
    pub path: PathBuf,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// How long a connection waits on `SQLITE_BUSY` before giving up.
    pub busy_timeout: Duration,
    /// How long to wait for a pooled connection.
    pub acquire_timeout: Duration,
}

impl SqliteConfig {
    /// Create a new configuration for the given database file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        }
    }

    /// Set the maximum number of connections.
    #[must_use]
    pub const fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the busy timeout.
    #[must_use]
    pub const fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH)
    }
}

/// Connection pool handle to the leaderboard database.
///
/// Wraps a [`sqlx::SqlitePool`]; cloning is cheap and shares the pool.
/// Store operations borrow the inner pool via [`SqliteDb::pool`].
#[derive(Clone)]
pub struct SqliteDb {
    pool: SqlitePool,
}

impl SqliteDb {
    /// Open the database file described by `config`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the path is empty.
    /// Returns [`DbError::Sqlite`] if the file cannot be opened.
    pub async fn connect(config: &SqliteConfig) -> Result<Self, DbError> {
        if config.path.as_os_str().is_empty() {
            return Err(DbError::Config(String::from("database path is empty")));
        }

        let connect_options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(config.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(connect_options)
            .await?;

        tracing::info!(
            path = %config.path.display(),
            max_connections = config.max_connections,
            "Opened SQLite database"
        );

        Ok(Self { pool })
    }

    /// Open a database file with default pool settings.
    ///
    /// Convenience wrapper around [`SqliteDb::connect`] with
    /// [`SqliteConfig::new`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the file cannot be opened.
    pub async fn connect_path(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let config = SqliteConfig::new(path);
        Self::connect(&config).await
    }

    /// Ensure the `leaderboard` table and its ranking index exist.
    ///
    /// Safe to run on every start; already-applied migrations are skipped
    /// and every statement is `IF NOT EXISTS`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Migration`] if any migration fails.
    pub async fn run_migrations(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// Return a reference to the underlying [`SqlitePool`].
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Whether [`SqliteDb::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Close all connections in the pool gracefully.
    ///
    /// The last connection to close checkpoints the WAL into the main file.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("SQLite pool closed");
    }
}
