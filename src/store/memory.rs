//! In-Memory Message Store
//!
//! Per-room append log implementing the durable-store contract. Deployments
//! implement [`MessageStore`] over their real database; this adapter keeps
//! the binary self-contained and the tests hermetic.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::store::MessageStore;

// == Memory Message Store ==
/// Append-only message log keyed by room identifier.
#[derive(Debug, Default)]
pub struct MemoryMessageStore<M> {
    rooms: RwLock<HashMap<String, Vec<M>>>,
}

impl<M> MemoryMessageStore<M>
where
    M: Clone + Send + Sync,
{
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Appends a message to a room's log.
    pub async fn append(&self, room_id: &str, message: M) {
        let mut rooms = self.rooms.write().await;
        rooms.entry(room_id.to_string()).or_default().push(message);
    }

    /// Number of messages persisted for a room.
    pub async fn room_len(&self, room_id: &str) -> usize {
        self.rooms
            .read()
            .await
            .get(room_id)
            .map_or(0, |log| log.len())
    }
}

#[async_trait]
impl<M> MessageStore<M> for MemoryMessageStore<M>
where
    M: Clone + Send + Sync,
{
    async fn find_recent(&self, room_id: &str, limit: usize) -> anyhow::Result<Vec<M>> {
        let rooms = self.rooms.read().await;
        let log = match rooms.get(room_id) {
            Some(log) => log,
            None => return Ok(Vec::new()),
        };
        // Log is append-ordered; walk it backwards for newest-first
        Ok(log.iter().rev().take(limit).cloned().collect())
    }
}
