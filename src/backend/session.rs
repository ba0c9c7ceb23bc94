//! Backend Session Module
//!
//! A process-wide handle over the cache backend. The session is created
//! once at startup, shared by clone, and applies a bounded timeout to every
//! backend call so no cache operation can hang its caller.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::backend::{Backend, Command};
use crate::error::{CacheError, Result};

// == Session ==
/// Shared, ready-to-use backend handle with per-operation timeouts.
///
/// Replaces scattered connect-if-needed checks: [`Session::connect`]
/// establishes the backend once, and every subsequent call goes through the
/// same handle. A call that exceeds the timeout fails with
/// [`CacheError::Unavailable`] instead of blocking.
#[derive(Clone)]
pub struct Session {
    backend: Arc<dyn Backend>,
    op_timeout: Duration,
}

impl Session {
    /// Wraps an already-connected backend.
    pub fn new(backend: Arc<dyn Backend>, op_timeout: Duration) -> Self {
        Self {
            backend,
            op_timeout,
        }
    }

    /// Connects the backend and returns the shared handle.
    pub async fn connect(backend: Arc<dyn Backend>, op_timeout: Duration) -> Result<Self> {
        let session = Self::new(backend, op_timeout);
        session.run(session.backend.connect()).await?;
        Ok(session)
    }

    /// Bounds a backend call with the session timeout.
    async fn run<T>(&self, call: impl std::future::Future<Output = Result<T>>) -> Result<T> {
        match timeout(self.op_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Unavailable(format!(
                "backend operation timed out after {}ms",
                self.op_timeout.as_millis()
            ))),
        }
    }

    /// Applies all commands as one atomic unit.
    pub async fn exec_batch(&self, commands: Vec<Command>) -> Result<()> {
        self.run(self.backend.exec_batch(commands)).await
    }

    /// Reads the whole list stored at `key`, head first.
    pub async fn range(&self, key: &str) -> Result<Vec<Vec<u8>>> {
        self.run(self.backend.range(key)).await
    }

    /// Returns true if a live entry exists at `key`.
    pub async fn exists(&self, key: &str) -> Result<bool> {
        self.run(self.backend.exists(key)).await
    }

    /// Atomically creates `key` if absent. Returns true on creation.
    pub async fn set_nx(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<bool> {
        self.run(self.backend.set_nx(key, value, ttl)).await
    }

    /// Removes `key`.
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.run(self.backend.delete(key)).await
    }

    /// Increments the counter at `key`, returning the new value.
    pub async fn incr(&self, key: &str) -> Result<i64> {
        self.run(self.backend.incr(key)).await
    }

    /// Reads multiple scalar keys in one round trip.
    pub async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<Vec<u8>>>> {
        self.run(self.backend.get_many(keys)).await
    }
}
