//! Catalog service and per-movie event streams for FlixFlux.
//!
//! This crate is the transport-agnostic core: the HTTP layer binds to the
//! three [`CatalogService`] operations and nothing else.
//!
//! # Modules
//!
//! - [`catalog`] -- [`CatalogService`]: list, lookup, and event streams.
//! - [`stream`] -- Tick source paired with the per-movie event generator.
//! - [`clock`] -- Wall-clock sources used to stamp events.
//! - [`seeder`] -- Startup wipe-and-repopulate of the movie store.
//! - [`config`] -- Configuration loading from `flixflux-config.yaml` into
//!   strongly-typed structs.
//!
//! [`CatalogService`]: catalog::CatalogService

pub mod catalog;
pub mod clock;
pub mod config;
pub mod seeder;
pub mod stream;

pub use catalog::{CatalogError, CatalogService};
pub use clock::{Clock, SystemClock, TokioClock};
pub use config::{ConfigError, FlixFluxConfig};
pub use seeder::{SeedReport, seed_movies};
pub use stream::{ActiveTimers, MovieEventStream};
