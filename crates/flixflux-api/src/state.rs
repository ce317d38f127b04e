//! Shared application state for the catalog API.

use flixflux_core::CatalogService;
use tokio_util::sync::CancellationToken;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor.
#[derive(Clone)]
pub struct AppState {
    /// The catalog every handler reads through.
    pub catalog: CatalogService,
    /// Cancelled when the server begins shutting down. Open event
    /// streams end when it fires.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Create application state around a catalog.
    pub fn new(catalog: CatalogService) -> Self {
        Self {
            catalog,
            shutdown: CancellationToken::new(),
        }
    }
}
