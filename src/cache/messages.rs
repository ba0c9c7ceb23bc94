//! Room Message Cache Module
//!
//! The core: a bounded, TTL-expiring window of recent messages per chat
//! room, kept in the backend and lazily warmed from the durable store.
//! Every mutation that must stay consistent (push + trim + expire) runs as
//! one atomic backend batch, and warm-up is guarded by a set-if-absent
//! claim so concurrent callers never double-populate a room.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::backend::{Command, Session};
use crate::cache::codec::{Codec, Json};
use crate::cache::keys::{self, HIT_COUNT_KEY, MISS_COUNT_KEY};
use crate::cache::stats::{parse_counter, CacheStats};
use crate::error::{CacheError, Result};
use crate::store::MessageStore;

/// How long a warm-up claim may outlive a crashed populator before another
/// caller can take over.
const WARM_CLAIM_TTL: Duration = Duration::from_secs(30);

// == Message Cache ==
/// Bounded recent-message window per room with hit/miss accounting.
///
/// The backend is the only copy of the window; this struct holds no message
/// state of its own and is cheap to share behind an `Arc`.
pub struct MessageCache<M, C = Json> {
    session: Session,
    store: Arc<dyn MessageStore<M>>,
    codec: C,
    window_size: usize,
    ttl: Duration,
}

impl<M> MessageCache<M>
where
    M: Serialize + DeserializeOwned + Send + Sync,
{
    // == Constructor ==
    /// Creates a cache with the default JSON codec.
    ///
    /// # Arguments
    /// * `session` - Shared backend handle
    /// * `store` - Durable store consulted on warm-up
    /// * `window_size` - Maximum messages kept per room
    /// * `ttl` - Idle lifetime of a room window
    pub fn new(
        session: Session,
        store: Arc<dyn MessageStore<M>>,
        window_size: usize,
        ttl: Duration,
    ) -> Self {
        Self::with_codec(session, store, Json, window_size, ttl)
    }
}

impl<M, C> MessageCache<M, C>
where
    M: Serialize + DeserializeOwned + Send + Sync,
    C: Codec,
{
    /// Creates a cache with a custom message codec.
    pub fn with_codec(
        session: Session,
        store: Arc<dyn MessageStore<M>>,
        codec: C,
        window_size: usize,
        ttl: Duration,
    ) -> Self {
        Self {
            session,
            store,
            codec,
            window_size,
            ttl,
        }
    }

    /// Maximum number of messages kept per room window.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    // == Record Message ==
    /// Inserts a newly created message at the head of the room's window.
    ///
    /// Push, trim to the window size and TTL refresh are applied as one
    /// atomic batch; a concurrent reader never sees an untrimmed or
    /// un-expiring intermediate state.
    ///
    /// Failures are [`CacheError::Unavailable`]-class and must not fail the
    /// caller's write path: the durable store is written independently and
    /// remains the source of truth.
    pub async fn record_message(&self, room_id: &str, message: &M) -> Result<()> {
        validate_room_id(room_id)?;
        let key = keys::message_key(room_id);
        let blob = self.codec.encode(message)?;

        self.session
            .exec_batch(vec![
                Command::PushFront {
                    key: key.clone(),
                    value: blob,
                },
                Command::Trim {
                    key: key.clone(),
                    start: 0,
                    stop: self.window_size.saturating_sub(1),
                },
                Command::Expire { key, ttl: self.ttl },
            ])
            .await
    }

    // == Recent Messages ==
    /// Returns the room's cached window, newest first.
    ///
    /// Whatever is presently stored is returned, which may be empty — the
    /// cache cannot tell a never-warmed room from an expired one. Each call
    /// bumps the hit counter (non-empty result) or the miss counter (empty
    /// result). Entries that fail to decode are skipped and logged rather
    /// than aborting the read.
    pub async fn recent_messages(&self, room_id: &str) -> Result<Vec<M>> {
        validate_room_id(room_id)?;
        let key = keys::message_key(room_id);
        let blobs = self.session.range(&key).await?;

        let mut messages = Vec::with_capacity(blobs.len());
        for blob in &blobs {
            match self.codec.decode(blob) {
                Ok(message) => messages.push(message),
                Err(err) => {
                    warn!("skipping undecodable cache entry for room {room_id}: {err}");
                }
            }
        }

        let counter = if messages.is_empty() {
            MISS_COUNT_KEY
        } else {
            HIT_COUNT_KEY
        };
        // The window read already succeeded; a lost counter bump only
        // degrades statistics
        if let Err(err) = self.session.incr(counter).await {
            warn!("cache counter update failed: {err}");
        }

        Ok(messages)
    }

    // == Ensure Warm ==
    /// Lazily populates a room's window from the durable store.
    ///
    /// No-op when the window already exists. Otherwise one concurrent
    /// caller wins the warming claim, queries the durable store for up to
    /// `window_size` newest messages and appends them oldest-first in one
    /// atomic batch, leaving the stored order newest-first like
    /// [`Self::record_message`]. Losing callers return immediately; the
    /// winner's result becomes visible to all.
    pub async fn ensure_warm(&self, room_id: &str) -> Result<()> {
        validate_room_id(room_id)?;
        let key = keys::message_key(room_id);
        if self.session.exists(&key).await? {
            return Ok(());
        }

        let claim = keys::warming_key(room_id);
        if !self
            .session
            .set_nx(&claim, b"1".to_vec(), WARM_CLAIM_TTL)
            .await?
        {
            debug!("room {room_id} is already being warmed");
            return Ok(());
        }

        let populated = self.populate(room_id, &key).await;
        // Best effort: the claim TTL is the backstop if the release fails
        if let Err(err) = self.session.delete(&claim).await {
            warn!("failed to release warm-up claim for room {room_id}: {err}");
        }
        populated
    }

    /// Runs the durable query and window append under a held claim.
    async fn populate(&self, room_id: &str, key: &str) -> Result<()> {
        // A previous claim holder may have populated between our existence
        // check and winning the claim
        if self.session.exists(key).await? {
            return Ok(());
        }

        let recent = self
            .store
            .find_recent(room_id, self.window_size)
            .await
            .map_err(CacheError::Store)?;
        if recent.is_empty() {
            debug!("warm-up found no durable messages for room {room_id}");
            return Ok(());
        }

        let mut commands = Vec::with_capacity(recent.len() + 1);
        // The store reports newest first; append oldest first so the stored
        // window reads newest first
        for message in recent.iter().rev() {
            commands.push(Command::PushBack {
                key: key.to_string(),
                value: self.codec.encode(message)?,
            });
        }
        commands.push(Command::Expire {
            key: key.to_string(),
            ttl: self.ttl,
        });
        self.session.exec_batch(commands).await?;

        info!("warmed room {room_id} with {} messages", recent.len());
        Ok(())
    }

    // == Is Window Full ==
    /// True iff the window holds exactly `window_size` messages, meaning
    /// older history can only come from the durable store.
    pub fn is_window_full(&self, window: &[M]) -> bool {
        window.len() == self.window_size
    }

    // == Stats ==
    /// Reads the global hit/miss counters, treating absent counters as 0.
    pub async fn stats(&self) -> Result<CacheStats> {
        let values = self
            .session
            .get_many(&[HIT_COUNT_KEY, MISS_COUNT_KEY])
            .await?;
        let hit = parse_counter(values.first().and_then(|v| v.as_ref()));
        let miss = parse_counter(values.get(1).and_then(|v| v.as_ref()));
        Ok(CacheStats::new(hit, miss))
    }
}

fn validate_room_id(room_id: &str) -> Result<()> {
    if room_id.is_empty() {
        return Err(CacheError::InvalidArgument(
            "room id must not be empty".to_string(),
        ));
    }
    Ok(())
}
