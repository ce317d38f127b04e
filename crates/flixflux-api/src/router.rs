//! Axum router construction for the catalog API.
//!
//! Assembles the JSON and SSE routes into a single [`Router`] with CORS
//! enabled for browser clients and request tracing.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::sse;
use crate::state::AppState;

/// Build the complete Axum router for the catalog API.
///
/// The router includes:
/// - `GET /movies` -- full catalog
/// - `GET /movies/{movieId}` -- single movie
/// - `GET /movies/{movieId}/events` -- SSE event stream
///
/// Only `GET` is allowed; CORS accepts any origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/movies", get(handlers::list_movies))
        .route("/movies/{movie_id}", get(handlers::get_movie))
        .route("/movies/{movie_id}/events", get(sse::movie_events))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
