//! Chat Cache - A bounded, TTL-backed recent-message cache
//!
//! Hosts the cache status HTTP surface over an in-process backend.

mod api;
mod backend;
mod cache;
mod config;
mod error;
mod models;
mod store;
mod tasks;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use backend::{MemoryBackend, Session};
use config::Config;
use tasks::spawn_cleanup_task;

/// Main entry point for the chat cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the backend session (once, shared by all operations)
/// 4. Start background expiry sweep task
/// 5. Create Axum router with the status endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Chat Cache Server");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: window_size={}, ttl={}s, backend_timeout={}ms, port={}, cleanup_interval={}s",
        config.window_size,
        config.ttl_seconds,
        config.backend_timeout_ms,
        config.server_port,
        config.cleanup_interval
    );

    // Connect the backend session once; all cache operations share it
    let backend = Arc::new(MemoryBackend::new());
    let session = match Session::connect(
        backend.clone(),
        Duration::from_millis(config.backend_timeout_ms),
    )
    .await
    {
        Ok(session) => session,
        Err(err) => {
            error!("Failed to connect cache backend: {err}");
            std::process::exit(1);
        }
    };
    info!("Cache backend connected");

    // Start background expiry sweep
    let cleanup_handle = spawn_cleanup_task(backend, config.cleanup_interval);
    info!("Background expiry sweep started");

    // Create application state and router
    let state = AppState::with_session(session, &config);
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .unwrap();

    info!("Server shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    // Abort the sweep task
    cleanup_handle.abort();
    warn!("Expiry sweep task aborted");
}
