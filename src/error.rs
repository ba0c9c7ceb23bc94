//! Error types for the message cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the message cache.
///
/// The cache is a best-effort acceleration layer: callers on the message
/// write/read path treat `Unavailable` as non-fatal and fall back to the
/// durable store.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backend unreachable or the operation timed out
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    /// A message blob could not be encoded or decoded
    #[error("message serialization failed: {0}")]
    Serialization(String),

    /// Invalid input, rejected before touching the backend
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The durable store query during warm-up failed
    #[error("durable store query failed: {0}")]
    Store(#[source] anyhow::Error),

    /// Backend state did not match the expected shape (e.g. a counter key
    /// holding a list)
    #[error("internal cache error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::Unavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "cache backend is unavailable",
            ),
            CacheError::Serialization(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "cached data could not be decoded",
            ),
            CacheError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "invalid request"),
            CacheError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "durable store query failed",
            ),
            CacheError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal cache error"),
        };

        let body = Json(ErrorResponse::new(message, self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the message cache.
pub type Result<T> = std::result::Result<T, CacheError>;
