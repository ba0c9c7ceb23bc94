//! Cache Module
//!
//! Bounded, TTL-expiring recent-message windows per chat room, with lazy
//! warm-up from durable storage and global hit/miss accounting.

mod codec;
mod keys;
mod messages;
mod stats;


// Re-export public types
pub use codec::{Codec, Json};
pub use keys::{message_key, warming_key, HIT_COUNT_KEY, MESSAGE_KEY_PREFIX, MISS_COUNT_KEY};
pub use messages::MessageCache;
pub use stats::CacheStats;
