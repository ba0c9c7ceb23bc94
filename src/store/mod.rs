//! Durable Store Module
//!
//! The cache accelerates reads in front of a durable, append-capable
//! message store. [`MessageStore`] is the adapter contract the warm-up path
//! consumes; [`MemoryMessageStore`] is the bundled in-process adapter used
//! by the binary and the test suite.

mod memory;

pub use memory::MemoryMessageStore;

use async_trait::async_trait;

// == Message Store Trait ==
/// Query interface over persisted messages.
#[async_trait]
pub trait MessageStore<M>: Send + Sync {
    /// Returns up to `limit` of the room's most recent messages, newest
    /// first. Rooms with fewer messages return what they have.
    ///
    /// Adapter failures are opaque to the cache; it wraps them and releases
    /// its warm-up claim so another caller can retry.
    async fn find_recent(&self, room_id: &str, limit: usize) -> anyhow::Result<Vec<M>>;
}
