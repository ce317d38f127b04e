//! The catalog service: the three operations the HTTP layer binds to.
//!
//! [`CatalogService`] mediates between the transport and the
//! [`MovieStore`]. It holds no state of its own beyond the live-timer
//! counter, so it is cheap to clone into every request and every stream.
//!
//! # Event stream lifecycle
//!
//! ```text
//! PENDING_RESOLUTION --found--> STREAMING --dropped--> CANCELLED
//!         |
//!         +--not found / store error--> (ends, zero events)
//! ```
//!
//! Resolution happens on the first poll, not when
//! [`CatalogService::event_stream`] is called.

use std::sync::Arc;
use std::time::Duration;

use flixflux_db::{DbError, MovieStore};
use flixflux_types::{Movie, MovieEvent};
use futures::stream::{self, StreamExt};

use crate::clock::{Clock, SystemClock};
use crate::stream::{ActiveTimers, MovieEventStream, movie_events};

/// Default spacing between events on a movie's stream.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Errors surfaced by catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The movie store failed.
    #[error("movie store error: {0}")]
    Store(#[from] DbError),
}

/// Read-only catalog operations over a movie store.
#[derive(Clone)]
pub struct CatalogService {
    store: MovieStore,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    timers: ActiveTimers,
}

impl CatalogService {
    /// Create a catalog over `store` with the system clock and one-second ticks.
    pub fn new(store: MovieStore) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            tick_interval: DEFAULT_TICK_INTERVAL,
            timers: ActiveTimers::new(),
        }
    }

    /// Stamp events with `clock` instead of the system clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Space stream events `interval` apart.
    #[must_use]
    pub const fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Number of event streams currently holding a timer.
    pub fn active_streams(&self) -> usize {
        self.timers.count()
    }

    /// Every movie in store-native order. An empty store yields an empty list.
    pub async fn list_all(&self) -> Result<Vec<Movie>, CatalogError> {
        let movies = self.store.find_all().await?;
        tracing::debug!(count = movies.len(), "Listed movies");
        Ok(movies)
    }

    /// The movie with this id, or `None`.
    ///
    /// The id is passed to the store uninterpreted. A store failure is
    /// logged and reported as `None`: absence is an expected outcome here,
    /// not an error.
    pub async fn get_by_id(&self, id: &str) -> Option<Movie> {
        match self.store.find_by_id(id).await {
            Ok(movie) => movie,
            Err(e) => {
                tracing::warn!(movie_id = id, error = %e, "Movie lookup failed, treating as absent");
                None
            }
        }
    }

    /// One event per tick for the movie with this id, until dropped.
    ///
    /// The returned stream is lazy: the lookup runs on first poll. If no
    /// movie has this id the stream ends immediately without yielding.
    /// Otherwise the movie is captured once and the stream never ends on
    /// its own.
    pub fn event_stream(&self, id: &str) -> MovieEventStream {
        let catalog = self.clone();
        let id = id.to_owned();

        stream::once(async move {
            let movie = catalog.get_by_id(&id).await;
            (catalog, id, movie)
        })
        .flat_map(|(catalog, id, movie)| match movie {
            Some(movie) => {
                tracing::debug!(movie_id = %movie.id, "Movie resolved, streaming events");
                movie_events(
                    movie,
                    catalog.tick_interval,
                    Arc::clone(&catalog.clock),
                    &catalog.timers,
                )
                .left_stream()
            }
            None => {
                tracing::debug!(movie_id = %id, "No such movie, closing event stream");
                stream::empty::<MovieEvent>().right_stream()
            }
        })
        .boxed()
    }
}
