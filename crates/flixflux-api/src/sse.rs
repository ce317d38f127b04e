//! Server-Sent Events handler for per-movie event streams.
//!
//! Clients connect to `GET /movies/{movieId}/events` and receive one
//! `data:` frame per tick holding a JSON-encoded [`MovieEvent`]. The
//! stream ends at once, with no frames, when the id matches no movie.
//!
//! When the client goes away Axum drops the response body, which drops
//! the catalog stream and its timer. On server shutdown the stream ends
//! at the next poll so the connection can drain.
//!
//! [`MovieEvent`]: flixflux_types::MovieEvent

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};

use crate::state::AppState;

/// Open an event stream for one movie.
///
/// # Route
///
/// `GET /movies/{movieId}/events`
pub async fn movie_events(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    tracing::debug!(movie_id = %movie_id, "Event stream requested");

    let events = state
        .catalog
        .event_stream(&movie_id)
        .take_until(state.shutdown.clone().cancelled_owned())
        .map(|event| Event::default().json_data(&event));

    Sse::new(events).keep_alive(KeepAlive::default())
}
