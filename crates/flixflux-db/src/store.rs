//! Backend-agnostic movie store.
//!
//! [`MovieStore`] uses enum dispatch instead of a trait object because
//! async methods are not dyn-compatible. Every method is attempted exactly
//! once against the selected backend; there is no retry layer.

use flixflux_types::Movie;

use crate::error::DbError;
use crate::memory::InMemoryMovieStore;
use crate::movie_store::PgMovieStore;

/// A movie document store.
#[derive(Clone)]
pub enum MovieStore {
    /// In-process store.
    Memory(InMemoryMovieStore),
    /// `PostgreSQL` JSONB document table.
    Postgres(PgMovieStore),
}

impl MovieStore {
    /// Every movie in store-native order.
    pub async fn find_all(&self) -> Result<Vec<Movie>, DbError> {
        match self {
            Self::Memory(store) => Ok(store.find_all().await),
            Self::Postgres(store) => store.find_all().await,
        }
    }

    /// The movie with exactly this id, if any.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Movie>, DbError> {
        match self {
            Self::Memory(store) => Ok(store.find_by_id(id).await),
            Self::Postgres(store) => store.find_by_id(id).await,
        }
    }

    /// Remove every movie. Returns the number removed.
    pub async fn delete_all(&self) -> Result<u64, DbError> {
        match self {
            Self::Memory(store) => Ok(store.delete_all().await),
            Self::Postgres(store) => store.delete_all().await,
        }
    }

    /// Insert or replace `movie`.
    pub async fn save(&self, movie: &Movie) -> Result<(), DbError> {
        match self {
            Self::Memory(store) => {
                store.save(movie).await;
                Ok(())
            }
            Self::Postgres(store) => store.save(movie).await,
        }
    }

    /// Human-readable backend name for logging.
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }
}

impl From<InMemoryMovieStore> for MovieStore {
    fn from(store: InMemoryMovieStore) -> Self {
        Self::Memory(store)
    }
}

impl From<PgMovieStore> for MovieStore {
    fn from(store: PgMovieStore) -> Self {
        Self::Postgres(store)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[tokio::test]
    async fn memory_backend_dispatch() {
        let store = MovieStore::from(InMemoryMovieStore::new());
        assert_eq!(store.backend_name(), "memory");

        store.save(&Movie::new("id1", "AEon Flux")).await.unwrap();
        assert_eq!(store.find_all().await.unwrap().len(), 1);
        assert_eq!(
            store.find_by_id("id1").await.unwrap(),
            Some(Movie::new("id1", "AEon Flux"))
        );
        assert_eq!(store.delete_all().await.unwrap(), 1);
        assert_eq!(store.find_by_id("id1").await.unwrap(), None);
    }
}
