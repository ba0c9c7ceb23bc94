//! In-Memory Backend Module
//!
//! Single-process implementation of the [`Backend`] contract. Entries carry
//! their own expiry timestamp; expired entries are dropped lazily on access
//! and reclaimed periodically by the background sweep task.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::backend::{Backend, Command};
use crate::error::{CacheError, Result};

// == Entry ==
/// A stored value with optional expiry.
#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    expires_at: Option<u64>,
}

#[derive(Debug, Clone)]
enum Value {
    List(VecDeque<Vec<u8>>),
    Scalar(Vec<u8>),
}

impl Entry {
    /// An entry is expired once the current time is greater than or equal
    /// to its expiration time.
    fn is_expired(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }
}

/// Returns current Unix timestamp in milliseconds.
fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

// == Memory Backend ==
/// In-memory [`Backend`] holding all entries behind one async lock.
///
/// Batches execute under a single write-lock acquisition, which is what
/// makes them atomic with respect to concurrent readers.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all expired entries, returning how many were dropped.
    ///
    /// Reads already ignore expired entries; this reclaims their memory.
    pub async fn cleanup_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Current number of live plus not-yet-swept entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if no entries are stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Drops the entry at `key` if it has expired, then returns a live borrow.
fn live_entry<'a>(
    entries: &'a mut HashMap<String, Entry>,
    key: &str,
    now_ms: u64,
) -> Option<&'a mut Entry> {
    if entries.get(key).is_some_and(|e| e.is_expired(now_ms)) {
        entries.remove(key);
    }
    entries.get_mut(key)
}

fn apply(entries: &mut HashMap<String, Entry>, command: Command, now_ms: u64) -> Result<()> {
    match command {
        Command::PushFront { key, value } => {
            let entry = list_entry(entries, key, now_ms)?;
            if let Value::List(list) = &mut entry.value {
                list.push_front(value);
            }
            Ok(())
        }
        Command::PushBack { key, value } => {
            let entry = list_entry(entries, key, now_ms)?;
            if let Value::List(list) = &mut entry.value {
                list.push_back(value);
            }
            Ok(())
        }
        Command::Trim { key, start, stop } => {
            if let Some(entry) = live_entry(entries, &key, now_ms) {
                match &mut entry.value {
                    Value::List(list) => {
                        let kept: VecDeque<Vec<u8>> = list
                            .iter()
                            .skip(start)
                            .take(stop.saturating_sub(start) + 1)
                            .cloned()
                            .collect();
                        *list = kept;
                        Ok(())
                    }
                    Value::Scalar(_) => Err(wrong_type(&key)),
                }
            } else {
                Ok(())
            }
        }
        Command::Expire { key, ttl } => {
            // Like the EXPIRE command, a missing key is a silent no-op.
            if let Some(entry) = live_entry(entries, &key, now_ms) {
                entry.expires_at = Some(now_ms + ttl.as_millis() as u64);
            }
            Ok(())
        }
    }
}

/// Fetches or creates the list entry at `key`, erroring on a scalar.
fn list_entry<'a>(
    entries: &'a mut HashMap<String, Entry>,
    key: String,
    now_ms: u64,
) -> Result<&'a mut Entry> {
    // Drop a stale entry first so new pushes never land on an expired list
    if entries.get(&key).is_some_and(|e| e.is_expired(now_ms)) {
        entries.remove(&key);
    }
    let name = key.clone();
    let entry = entries.entry(key).or_insert_with(|| Entry {
        value: Value::List(VecDeque::new()),
        expires_at: None,
    });
    match entry.value {
        Value::List(_) => Ok(entry),
        Value::Scalar(_) => Err(wrong_type(&name)),
    }
}

fn wrong_type(key: &str) -> CacheError {
    CacheError::Internal(format!("key '{key}' holds a value of the wrong type"))
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn exec_batch(&self, commands: Vec<Command>) -> Result<()> {
        let now = current_timestamp_ms();
        let mut entries = self.entries.write().await;
        for command in commands {
            apply(&mut entries, command, now)?;
        }
        Ok(())
    }

    async fn range(&self, key: &str) -> Result<Vec<Vec<u8>>> {
        let now = current_timestamp_ms();
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key, now) {
            Some(entry) => match &entry.value {
                Value::List(list) => Ok(list.iter().cloned().collect()),
                Value::Scalar(_) => Err(wrong_type(key)),
            },
            None => Ok(Vec::new()),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let now = current_timestamp_ms();
        let mut entries = self.entries.write().await;
        Ok(live_entry(&mut entries, key, now).is_some())
    }

    async fn set_nx(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<bool> {
        let now = current_timestamp_ms();
        let mut entries = self.entries.write().await;
        if live_entry(&mut entries, key, now).is_some() {
            return Ok(false);
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: Value::Scalar(value),
                expires_at: Some(now + ttl.as_millis() as u64),
            },
        );
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let now = current_timestamp_ms();
        let mut entries = self.entries.write().await;
        let current = match live_entry(&mut entries, key, now) {
            Some(entry) => match &entry.value {
                Value::Scalar(bytes) => std::str::from_utf8(bytes)
                    .ok()
                    .and_then(|s| s.parse::<i64>().ok())
                    .ok_or_else(|| wrong_type(key))?,
                Value::List(_) => return Err(wrong_type(key)),
            },
            None => 0,
        };
        let next = current + 1;
        let expires_at = entries.get(key).and_then(|e| e.expires_at);
        entries.insert(
            key.to_string(),
            Entry {
                value: Value::Scalar(next.to_string().into_bytes()),
                expires_at,
            },
        );
        Ok(next)
    }

    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<Vec<u8>>>> {
        let now = current_timestamp_ms();
        let mut entries = self.entries.write().await;
        let mut values = Vec::with_capacity(keys.len());
        for &key in keys {
            let value = match live_entry(&mut entries, key, now) {
                Some(entry) => match &entry.value {
                    Value::Scalar(bytes) => Some(bytes.clone()),
                    Value::List(_) => return Err(wrong_type(key)),
                },
                None => None,
            };
            values.push(value);
        }
        Ok(values)
    }
}
