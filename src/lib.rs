//! Chat Cache - A bounded, TTL-backed recent-message cache
//!
//! Keeps the most recent messages per chat room in a fast backend tier,
//! lazily warmed from durable storage, with hit/miss accounting.

pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use backend::{Backend, Command, MemoryBackend, Session};
pub use cache::{CacheStats, MessageCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use models::ChatMessage;
pub use store::{MemoryMessageStore, MessageStore};
pub use tasks::spawn_cleanup_task;
