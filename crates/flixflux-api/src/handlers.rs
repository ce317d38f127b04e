//! JSON endpoint handlers for the catalog API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/movies` | JSON array of every movie |
//! | `GET` | `/movies/{movieId}` | A single movie, or 404 |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use flixflux_types::Movie;

use crate::error::ApiError;
use crate::state::AppState;

/// Return the full catalog as a JSON array of `{id, title}`.
pub async fn list_movies(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Movie>>, ApiError> {
    let movies = state.catalog.list_all().await?;
    Ok(Json(movies))
}

/// Return a single movie.
///
/// Any path segment is accepted as an id; ids that match nothing,
/// malformed or not, yield 404.
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> Result<Json<Movie>, ApiError> {
    state
        .catalog
        .get_by_id(&movie_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("movie {movie_id}")))
}
