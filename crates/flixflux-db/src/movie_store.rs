//! `PostgreSQL` operations on the `movies` document table.
//!
//! Each row holds one serialized [`Movie`] in a JSONB `document` column,
//! keyed by the movie id. Reads decode the document back; the `id` column
//! exists only for point lookups and upserts.

use flixflux_types::Movie;
use sqlx::PgPool;

use crate::error::DbError;

/// Operations on the `movies` table.
#[derive(Clone)]
pub struct PgMovieStore {
    pool: PgPool,
}

impl PgMovieStore {
    /// Create a movie store bound to a connection pool.
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return every stored movie in insertion order.
    pub async fn find_all(&self) -> Result<Vec<Movie>, DbError> {
        let rows = sqlx::query_as::<_, MovieRow>(
            r"SELECT id, document, created_at
              FROM movies
              ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MovieRow::into_movie).collect()
    }

    /// Look up a single movie by id.
    ///
    /// The id is bound verbatim; ids that were never generated simply
    /// match no row.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Movie>, DbError> {
        let row = sqlx::query_as::<_, MovieRow>(
            r"SELECT id, document, created_at
              FROM movies
              WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MovieRow::into_movie).transpose()
    }

    /// Delete every movie. Returns the number of rows removed.
    pub async fn delete_all(&self) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM movies")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Insert `movie`, replacing any existing document with the same id.
    pub async fn save(&self, movie: &Movie) -> Result<(), DbError> {
        let document = serde_json::to_value(movie)?;
        sqlx::query(
            r"INSERT INTO movies (id, document)
              VALUES ($1, $2)
              ON CONFLICT (id) DO UPDATE SET document = EXCLUDED.document",
        )
        .bind(movie.id.as_str())
        .bind(&document)
        .execute(&self.pool)
        .await?;

        tracing::debug!(id = %movie.id, "Saved movie document");
        Ok(())
    }
}

/// A row from the `movies` table.
///
/// Uses runtime types rather than compile-time checked types to
/// avoid requiring a live database during builds.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MovieRow {
    /// Document id (mirrors `document.id`).
    pub id: String,
    /// The serialized [`Movie`].
    pub document: serde_json::Value,
    /// When the document was first inserted.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl MovieRow {
    /// Decode the JSONB document into a [`Movie`].
    pub fn into_movie(self) -> Result<Movie, DbError> {
        Ok(serde_json::from_value(self.document)?)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::Utc;

    use super::*;

    #[test]
    fn row_decodes_document() {
        let row = MovieRow {
            id: String::from("id1"),
            document: serde_json::json!({"id": "id1", "title": "AEon Flux"}),
            created_at: Utc::now(),
        };
        let movie = row.into_movie().unwrap();
        assert_eq!(movie, Movie::new("id1", "AEon Flux"));
    }

    #[test]
    fn row_with_bad_document_is_serialization_error() {
        let row = MovieRow {
            id: String::from("id1"),
            document: serde_json::json!({"name": "missing fields"}),
            created_at: Utc::now(),
        };
        assert!(matches!(row.into_movie(), Err(DbError::Serialization(_))));
    }
}
