//! Catalog HTTP server lifecycle management.
//!
//! Provides [`start_server`] which binds to a TCP port and serves the
//! catalog until the supplied shutdown future resolves, and [`serve`]
//! for an already-bound listener.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Configuration for the catalog server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}

impl ServerConfig {
    /// Parse `host:port` into a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
        }
    }
}

/// Start the catalog HTTP server.
///
/// Binds to the configured address and hands off to [`serve`].
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind or the server
/// encounters a fatal I/O error.
pub async fn start_server<F>(
    config: &ServerConfig,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    serve(listener, state, shutdown).await
}

/// Serve the catalog on `listener` until `shutdown` resolves.
///
/// When `shutdown` resolves the state's shutdown token is cancelled, so
/// open event streams end and their timers are released. The server then
/// waits for in-flight responses to finish before returning.
///
/// # Errors
///
/// Returns an error if the server encounters a fatal I/O error.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Catalog server listening");
    }

    let token = state.shutdown.clone();
    let router = build_router(state);
    let signal = async move {
        shutdown.await;
        info!("Closing open event streams");
        token.cancel();
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(signal)
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))?;

    info!("Catalog server stopped");
    Ok(())
}

/// Errors that can occur when starting or running the catalog server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}
