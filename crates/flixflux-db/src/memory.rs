//! In-process movie store.
//!
//! Keeps documents in a [`Vec`] behind a [`tokio::sync::RwLock`] so the
//! store-native iteration order is insertion order. Used when no database
//! is configured and throughout the test suites.

use std::sync::Arc;

use flixflux_types::Movie;
use tokio::sync::RwLock;

/// Movie documents held in memory.
///
/// Cloning shares the underlying collection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMovieStore {
    movies: Arc<RwLock<Vec<Movie>>>,
}

impl InMemoryMovieStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `movies`.
    pub fn with_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        Self {
            movies: Arc::new(RwLock::new(movies.into_iter().collect())),
        }
    }

    /// Snapshot of every movie in insertion order.
    pub async fn find_all(&self) -> Vec<Movie> {
        self.movies.read().await.clone()
    }

    /// Find the movie whose id equals `id` exactly.
    pub async fn find_by_id(&self, id: &str) -> Option<Movie> {
        self.movies
            .read()
            .await
            .iter()
            .find(|m| m.id.as_str() == id)
            .cloned()
    }

    /// Remove every movie, returning how many were removed.
    pub async fn delete_all(&self) -> u64 {
        let mut movies = self.movies.write().await;
        let removed = u64::try_from(movies.len()).unwrap_or(u64::MAX);
        movies.clear();
        removed
    }

    /// Insert `movie`, replacing in place any movie with the same id.
    pub async fn save(&self, movie: &Movie) {
        let mut movies = self.movies.write().await;
        if let Some(existing) = movies.iter_mut().find(|m| m.id == movie.id) {
            existing.clone_from(movie);
        } else {
            movies.push(movie.clone());
        }
    }
}
