//! Data models for the message cache
//!
//! Defines the cached message record and the DTOs used for
//! serializing HTTP response bodies.

pub mod message;
pub mod responses;

// Re-export commonly used types
pub use message::ChatMessage;
pub use responses::{CacheStatusResponse, ErrorResponse, HealthResponse};
