//! Shared type definitions for the FlixFlux movie catalog.
//!
//! This crate is the single source of truth for the types that cross crate
//! boundaries: the stored [`Movie`] document and the ephemeral
//! [`MovieEvent`] pushed over the event stream. Types flow downstream to
//! `TypeScript` via `ts-rs` for browser clients of the stream.
//!
//! # Modules
//!
//! - [`ids`] -- The [`MovieId`] key wrapper
//! - [`structs`] -- [`Movie`] and [`MovieEvent`]

pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::MovieId;
pub use structs::{Movie, MovieEvent};
