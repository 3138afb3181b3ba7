//! Axum router construction for the Scoreboard API.
//!
//! Assembles all routes into a single [`Router`] with request tracing,
//! CORS for browser game clients, and per-client rate limiting.

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::rate_limit;
use crate::state::AppState;

/// Build the complete Axum router for the Scoreboard server.
///
/// The router includes:
/// - `GET /api/scores` -- top 10 entries
/// - `POST /api/scores` -- submit a score
/// - `GET /api/health` -- liveness probe
///
/// Rate limiting runs inside the trace layer so rejected requests are
/// still traced.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/scores",
            get(handlers::list_scores).post(handlers::submit_score),
        )
        .route("/api/health", get(handlers::health))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            rate_limit::enforce,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
