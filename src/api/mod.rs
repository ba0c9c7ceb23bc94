//! API Module
//!
//! HTTP handlers and routing for the cache status surface.
//!
//! # Endpoints
//! - `GET /api/status/cache` - Hit/miss counters and hit rate
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
