//! Catalog entity structs.
//!
//! [`Movie`] is the only persisted document. [`MovieEvent`] is generated on
//! demand, one per tick of an event stream, and is never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::MovieId;

/// A movie document in the catalog.
///
/// Immutable once created. The seeder is the only writer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Movie {
    /// Unique document id.
    pub id: MovieId,
    /// Display title.
    pub title: String,
}

impl Movie {
    /// Create a movie with the given id and title.
    pub fn new(id: impl Into<MovieId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    /// Create a movie with a freshly generated id.
    pub fn with_generated_id(title: impl Into<String>) -> Self {
        Self::new(MovieId::generate(), title)
    }
}

/// A single tick of a movie's event stream.
///
/// The movie is captured once when the stream resolves it, so every event
/// on one stream carries the same movie even if the document is deleted
/// afterwards. `date` is the wall-clock time of the tick that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MovieEvent {
    /// The movie the stream was opened for.
    pub movie: Movie,
    /// When the tick fired (UTC).
    pub date: DateTime<Utc>,
}

impl MovieEvent {
    /// Create an event for `movie` stamped at `date`.
    pub const fn new(movie: Movie, date: DateTime<Utc>) -> Self {
        Self { movie, date }
    }
}
