//! Response DTOs for the cache status API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the cache status endpoint (GET /api/status/cache)
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatusResponse {
    /// Always true on the success path
    pub success: bool,
    /// Counter snapshot with the formatted hit rate
    pub data: CacheStats,
}

impl CacheStatusResponse {
    /// Creates a success response wrapping a stats snapshot
    pub fn new(data: CacheStats) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Error response body for all failure conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always false on the failure path
    pub success: bool,
    /// Human-readable summary of what failed
    pub message: String,
    /// Underlying error detail
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: error.into(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
