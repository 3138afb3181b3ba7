//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`] which wraps the underlying
//! [`sqlx`] errors with additional context about which operation failed.

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `SQLite` operation failed (file, connection, or query).
    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    /// A schema migration failed.
    #[error("SQLite migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A row violated a table constraint such as `score >= 0`.
    ///
    /// Submissions are normalized before they reach the store, so this
    /// signals a bug in the caller rather than bad user input.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Classify a failed write, separating constraint violations from
    /// plain I/O or connection failures.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            match db_err.kind() {
                sqlx::error::ErrorKind::CheckViolation
                | sqlx::error::ErrorKind::NotNullViolation => {
                    return Self::ConstraintViolation(db_err.message().to_owned());
                }
                _ => {}
            }
        }
        Self::Sqlite(err)
    }
}
