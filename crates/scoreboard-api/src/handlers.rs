//! REST API endpoint handlers for the Scoreboard server.
//!
//! Handlers are thin: they translate requests into [`LeaderboardStore`]
//! calls and results into responses. Validation lives in
//! [`scoreboard_types::submission`]; ordering lives in the store.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/scores` | Top 10 entries, best first |
//! | `POST` | `/api/scores` | Submit `{player, score}` |
//! | `GET` | `/api/health` | Liveness probe |

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use scoreboard_db::LeaderboardStore;
use scoreboard_types::{DEFAULT_TOP_N, RankedScore, ScoreEntry, Submission};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /api/scores -- leaderboard
// ---------------------------------------------------------------------------

/// Return the top entries as `[{player, score, created_at}, ...]`.
pub async fn list_scores(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RankedScore>>, ApiError> {
    let entries = LeaderboardStore::new(state.db.pool())
        .top_n(DEFAULT_TOP_N)
        .await?;

    Ok(Json(entries.iter().map(ScoreEntry::to_ranked).collect()))
}

// ---------------------------------------------------------------------------
// POST /api/scores -- submit a score
// ---------------------------------------------------------------------------

/// Normalize and append a submission. Answers `201` with an empty body.
///
/// The body is read as raw bytes rather than through the `Json` extractor
/// so that a missing content type or an empty body is handled like an
/// empty object and reported as `player required`.
pub async fn submit_score(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let payload = parse_body(&body)?;
    let submission = Submission::from_json(&payload)?;

    let id = LeaderboardStore::new(state.db.pool())
        .append(&submission.player, submission.score)
        .await?;

    tracing::info!(
        %id,
        player = submission.player,
        score = submission.score,
        "Score submitted"
    );

    Ok(StatusCode::CREATED)
}

// ---------------------------------------------------------------------------
// GET /api/health -- liveness
// ---------------------------------------------------------------------------

/// Report `{"ok": true}` while the store answers, `503 {"ok": false}` otherwise.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let ok = LeaderboardStore::new(state.db.pool()).health_check().await;
    let status = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(serde_json::json!({ "ok": ok })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a request body as JSON. A blank body reads as `null`.
fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
}
