//! Cache Backend Module
//!
//! Defines the contract the message cache requires from its key-value
//! backend: list operations, TTL expiry, atomic multi-command batches,
//! counters and a set-if-absent claim primitive. A single-process
//! [`MemoryBackend`] implementation is bundled; a networked backend with
//! the same semantics (e.g. a Redis instance) plugs in behind the same
//! trait.

mod memory;
mod session;

pub use memory::MemoryBackend;
pub use session::Session;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

// == Batch Commands ==
/// A single mutation inside an atomic batch.
///
/// Batches passed to [`Backend::exec_batch`] are applied as one indivisible
/// unit: a concurrent reader observes either none or all of the commands.
#[derive(Debug, Clone)]
pub enum Command {
    /// Insert a blob at the head of a list, creating the list if absent
    PushFront { key: String, value: Vec<u8> },
    /// Append a blob at the tail of a list, creating the list if absent
    PushBack { key: String, value: Vec<u8> },
    /// Keep only the inclusive index range `[start, stop]` of a list
    Trim { key: String, start: usize, stop: usize },
    /// Set the key's time-to-live, replacing any previous expiry
    Expire { key: String, ttl: Duration },
}

// == Backend Trait ==
/// Key-value backend with list semantics, expiry and atomic batches.
///
/// All methods are cancel-safe from the caller's perspective: a batch is
/// either fully applied or not applied at all, so abandoning an in-flight
/// call never leaves a half-written window.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Establishes the backend connection. Idempotent; called once by
    /// [`Session::connect`] at process start.
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    /// Applies all commands as one atomic unit.
    async fn exec_batch(&self, commands: Vec<Command>) -> Result<()>;

    /// Reads the whole list stored at `key`, head first. Absent keys read
    /// as an empty list.
    async fn range(&self, key: &str) -> Result<Vec<Vec<u8>>>;

    /// Returns true if a live (non-expired) entry exists at `key`.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Atomically creates `key` with `value` and `ttl` if no live entry
    /// exists. Returns true if the key was created by this call.
    async fn set_nx(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<bool>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Atomically increments the integer counter at `key`, treating an
    /// absent key as 0. Returns the new value.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Reads multiple scalar keys in one round trip. Absent or expired
    /// keys yield `None`.
    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<Vec<u8>>>>;
}
