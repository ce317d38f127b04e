//! FlixFlux service binary.
//!
//! Wires the movie store, the catalog service and the HTTP surface
//! together. All process-wide setup happens once, here, before the
//! listener accepts its first connection.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (`flixflux-config.yaml` or `FLIXFLUX_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Open the movie store (in-memory, or `PostgreSQL` + migrations)
//! 4. Reseed the store with the configured titles
//! 5. Serve the catalog API until Ctrl-C / SIGTERM

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use flixflux_api::{AppState, ServerConfig};
use flixflux_core::config::StoreBackend;
use flixflux_core::{CatalogService, FlixFluxConfig, seed_movies};
use flixflux_db::{DbError, InMemoryMovieStore, MovieStore, PostgresConfig, PostgresPool};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::ServiceError;

/// Config file looked up in the working directory when
/// `FLIXFLUX_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "flixflux-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any startup step fails or the server stops
/// abnormally.
#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    // 1. Load configuration. Logging is not up yet, so remember whether
    //    the file was found and report it afterwards.
    let (config, loaded_from) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("flixflux starting");
    match &loaded_from {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }
    info!(
        host = config.server.host,
        port = config.server.port,
        backend = ?config.store.backend,
        tick_interval_ms = config.stream.tick_interval_ms,
        "Effective configuration"
    );

    // 3. Open the movie store.
    let (store, pool) = open_store(&config).await?;
    info!(backend = store.backend_name(), "Movie store ready");

    // 4. Reseed.
    if config.seed.enabled {
        seed_movies(&store, &config.seed.titles).await?;
    } else {
        info!("Seeding disabled, serving existing catalog");
    }

    // 5. Serve.
    let catalog =
        CatalogService::new(store).with_tick_interval(config.stream.tick_interval());
    let state = Arc::new(AppState::new(catalog));
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    flixflux_api::start_server(&server_config, state, shutdown_signal()).await?;

    if let Some(pool) = pool {
        pool.close().await;
    }
    info!("flixflux shutdown complete");
    Ok(())
}

/// Load configuration from `FLIXFLUX_CONFIG` or `flixflux-config.yaml`.
///
/// A missing file yields defaults (with environment overrides applied).
/// Returns the path the config was read from, if any.
fn load_config() -> Result<(FlixFluxConfig, Option<PathBuf>), ServiceError> {
    let path = std::env::var_os("FLIXFLUX_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if path.exists() {
        let config = FlixFluxConfig::from_file(&path)?;
        Ok((config, Some(path)))
    } else {
        let mut config = FlixFluxConfig::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok((config, None))
    }
}

/// Open the configured store backend.
///
/// For `PostgreSQL` this connects, runs migrations, and also returns the
/// pool so it can be closed on shutdown.
async fn open_store(
    config: &FlixFluxConfig,
) -> Result<(MovieStore, Option<PostgresPool>), ServiceError> {
    match config.store.backend {
        StoreBackend::Memory => Ok((MovieStore::from(InMemoryMovieStore::new()), None)),
        StoreBackend::Postgres => {
            let url = config.store.postgres_url.as_deref().ok_or_else(|| {
                DbError::Config(String::from("postgres backend selected without a URL"))
            })?;
            let pool_config = PostgresConfig::new(url)
                .with_max_connections(config.store.max_connections)
                .with_acquire_timeout(config.store.acquire_timeout());
            let pool = PostgresPool::connect(&pool_config).await?;
            pool.run_migrations().await?;
            Ok((MovieStore::from(pool.movie_store()), Some(pool)))
        }
    }
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
