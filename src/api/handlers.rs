//! API Handlers
//!
//! HTTP request handlers for the cache status surface. The message
//! read/write paths are library calls made by the chat backend, not HTTP
//! endpoints; only the observability surface is exposed here.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, Json};

use crate::backend::{MemoryBackend, Session};
use crate::cache::MessageCache;
use crate::config::Config;
use crate::error::Result;
use crate::models::{CacheStatusResponse, ChatMessage, HealthResponse};
use crate::store::MemoryMessageStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared message cache
    pub cache: Arc<MessageCache<ChatMessage>>,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: MessageCache<ChatMessage>) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Wires a cache over the given backend session per the configuration.
    pub fn with_session(session: Session, config: &Config) -> Self {
        let store = Arc::new(MemoryMessageStore::new());
        let cache = MessageCache::new(
            session,
            store,
            config.window_size,
            Duration::from_secs(config.ttl_seconds),
        );
        Self::new(cache)
    }

    /// Creates a fully in-process AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        let session = Session::new(
            Arc::new(MemoryBackend::new()),
            Duration::from_millis(config.backend_timeout_ms),
        );
        Self::with_session(session, config)
    }
}

/// Handler for GET /api/status/cache
///
/// Reads the global hit/miss counters and reports the aggregate hit rate.
pub async fn cache_status_handler(
    State(state): State<AppState>,
) -> Result<Json<CacheStatusResponse>> {
    let stats = state.cache.stats().await?;
    Ok(Json(CacheStatusResponse::new(stats)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
