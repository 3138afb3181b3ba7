//! Error types for the Scoreboard server binary.
//!
//! [`AppError`] is the top-level error type that wraps all possible
//! failure modes during startup and serving.

/// Top-level error for the Scoreboard server binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An environment variable held an unusable value.
    #[error("config error: {0}")]
    Config(String),

    /// The store could not be opened or migrated.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: scoreboard_db::DbError,
    },

    /// The HTTP server failed to bind or crashed while serving.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: scoreboard_api::ServerError,
    },
}
