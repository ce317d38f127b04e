//! Movie document store for the FlixFlux catalog.
//!
//! The catalog treats storage as an external collaborator with four
//! operations: find all, find by id, delete all, and save. This crate
//! provides those operations over two interchangeable backends, selected
//! at startup:
//!
//! ```text
//! MovieStore (enum dispatch)
//!     |
//!     +-- Memory   --> InMemoryMovieStore (RwLock<Vec<Movie>>)
//!     |
//!     +-- Postgres --> PgMovieStore (movies table, JSONB documents)
//! ```
//!
//! # Modules
//!
//! - [`store`] -- The [`MovieStore`] dispatch enum
//! - [`memory`] -- In-process backend used for demos and tests
//! - [`postgres`] -- `PostgreSQL` connection pool and configuration
//! - [`movie_store`] -- `PostgreSQL` movie document operations
//! - [`error`] -- Shared error types

pub mod error;
pub mod memory;
pub mod movie_store;
pub mod postgres;
pub mod store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use memory::InMemoryMovieStore;
pub use movie_store::{MovieRow, PgMovieStore};
pub use postgres::{PostgresConfig, PostgresPool};
pub use store::MovieStore;
