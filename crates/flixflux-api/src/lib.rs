//! HTTP surface for the FlixFlux movie catalog.
//!
//! This crate provides an Axum HTTP server that exposes the catalog
//! read-only:
//!
//! - **REST endpoints** returning JSON for the full catalog and single
//!   movies
//! - **Server-Sent Events endpoint** (`/movies/{movieId}/events`) pushing
//!   one [`MovieEvent`] per tick until the client disconnects
//!
//! # Architecture
//!
//! Handlers only call the three [`CatalogService`] operations. Encoding,
//! SSE framing, CORS and request tracing live here; the catalog knows
//! nothing about HTTP. A client disconnect drops the response body, which
//! drops the event stream and releases its timer; server shutdown ends
//! every open stream through the state's cancellation token.
//!
//! [`MovieEvent`]: flixflux_types::MovieEvent
//! [`CatalogService`]: flixflux_core::CatalogService

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod sse;
pub mod state;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, serve, start_server};
pub use state::AppState;
