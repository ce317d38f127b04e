//! Startup reseed of the movie store.
//!
//! Runs once before the HTTP listener accepts connections: delete every
//! movie, insert the configured titles in order with fresh ids, then log
//! the resulting catalog. Works against an empty or an already-populated
//! store.

use flixflux_db::{DbError, MovieStore};
use flixflux_types::Movie;

/// Outcome of a reseed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// Movies deleted before inserting.
    pub removed: u64,
    /// The catalog as read back after inserting, in store order.
    pub catalog: Vec<Movie>,
}

/// Wipe `store` and insert one movie per title.
///
/// Stops at the first store failure; movies inserted before the failure
/// stay in place.
pub async fn seed_movies<S>(store: &MovieStore, titles: &[S]) -> Result<SeedReport, DbError>
where
    S: AsRef<str>,
{
    let removed = store.delete_all().await?;
    tracing::info!(removed, backend = store.backend_name(), "Cleared movie store");

    for title in titles {
        let movie = Movie::with_generated_id(title.as_ref());
        store.save(&movie).await?;
    }

    let catalog = store.find_all().await?;
    for movie in &catalog {
        tracing::info!(id = %movie.id, title = %movie.title, "Seeded movie");
    }
    tracing::info!(count = catalog.len(), "Movie store seeded");

    Ok(SeedReport { removed, catalog })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashSet;

    use flixflux_db::InMemoryMovieStore;

    use super::*;
    use crate::config::DEFAULT_SEED_TITLES;

    #[tokio::test]
    async fn seeds_empty_store_in_order() {
        let store = MovieStore::from(InMemoryMovieStore::new());
        let report = seed_movies(&store, &DEFAULT_SEED_TITLES).await.unwrap();

        assert_eq!(report.removed, 0);
        let titles: Vec<&str> = report.catalog.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, DEFAULT_SEED_TITLES);
    }

    #[tokio::test]
    async fn replaces_existing_movies() {
        let store = MovieStore::from(InMemoryMovieStore::with_movies([
            Movie::new("old1", "Old One"),
            Movie::new("old2", "Old Two"),
        ]));
        let report = seed_movies(&store, &["Back to the Future"]).await.unwrap();

        assert_eq!(report.removed, 2);
        assert_eq!(report.catalog.len(), 1);
        assert!(store.find_by_id("old1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn every_seeded_movie_gets_a_distinct_id() {
        let store = MovieStore::from(InMemoryMovieStore::new());
        let report = seed_movies(&store, &DEFAULT_SEED_TITLES).await.unwrap();

        let ids: HashSet<&str> = report.catalog.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), DEFAULT_SEED_TITLES.len());
    }

    #[tokio::test]
    async fn reseeding_twice_keeps_one_copy() {
        let store = MovieStore::from(InMemoryMovieStore::new());
        seed_movies(&store, &DEFAULT_SEED_TITLES).await.unwrap();
        let second = seed_movies(&store, &DEFAULT_SEED_TITLES).await.unwrap();

        assert_eq!(second.removed, 5);
        assert_eq!(second.catalog.len(), 5);
    }

    #[tokio::test]
    async fn no_titles_leaves_store_empty() {
        let store = MovieStore::from(InMemoryMovieStore::with_movies([Movie::new("x", "X")]));
        let report = seed_movies::<&str>(&store, &[]).await.unwrap();
        assert!(report.catalog.is_empty());
    }
}
