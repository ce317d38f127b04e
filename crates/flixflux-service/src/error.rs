//! Error types for the service binary.
//!
//! [`ServiceError`] is the top-level error type that wraps all possible
//! failure modes during startup and serving.

/// Top-level error for the service binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: flixflux_core::ConfigError,
    },

    /// The movie store could not be opened or seeded.
    #[error("store error: {source}")]
    Store {
        /// The underlying data layer error.
        #[from]
        source: flixflux_db::DbError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: flixflux_api::ServerError,
    },
}
