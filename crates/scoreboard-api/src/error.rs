//! Error types for the Scoreboard HTTP API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Every
//! error body has the shape `{"error": "<reason>"}`.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use scoreboard_db::DbError;
use scoreboard_types::Rejection;

/// Body returned for any server-side failure. Details go to the log only.
const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Body returned when a client exceeds its request budget.
///
/// Sent as JSON `{"error": ...}` like every other error, not as the plain
/// text `Too many requests, please try again later.` that earlier
/// deployments of the service returned.
pub const RATE_LIMITED_MESSAGE: &str = "too many requests, please try again later";

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The submission failed normalization.
    #[error("{0}")]
    Rejected(#[from] Rejection),

    /// The request body was not valid JSON.
    #[error("invalid JSON body: {0}")]
    InvalidBody(String),

    /// The store failed. Surfaces as a 500 for this request only.
    #[error("store error: {0}")]
    Store(#[from] DbError),

    /// The client exhausted its rate-limit window.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until the client's window resets.
        retry_after_secs: u64,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Rejected(rejection) => {
                tracing::debug!(reason = rejection.reason(), "Submission rejected");
                (StatusCode::BAD_REQUEST, rejection.reason().to_owned())
            }
            Self::InvalidBody(detail) => {
                tracing::debug!(detail = %detail, "Malformed request body");
                (StatusCode::BAD_REQUEST, String::from("invalid JSON body"))
            }
            Self::Store(e) => {
                tracing::error!(error = %e, "Leaderboard store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_owned(),
                )
            }
            Self::RateLimited { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_MESSAGE.to_owned())
            }
        };

        let body = serde_json::json!({ "error": message });
        let mut response = (status, axum::Json(body)).into_response();

        if let Self::RateLimited { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }

        response
    }
}
