//! Integration Tests for the Message Cache
//!
//! Exercises the cache end to end over the bundled in-memory backend and
//! durable store, plus test-double backends for outage behavior.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chat_cache::{
    Backend, CacheError, ChatMessage, Command, MemoryBackend, MemoryMessageStore, MessageCache,
    MessageStore, Session,
};

const WINDOW: usize = 10;
const TTL: Duration = Duration::from_secs(3600);

// == Helper Functions ==

fn session(backend: Arc<dyn Backend>) -> Session {
    Session::new(backend, Duration::from_secs(2))
}

fn build_cache(store: Arc<MemoryMessageStore<ChatMessage>>) -> MessageCache<ChatMessage> {
    MessageCache::new(session(Arc::new(MemoryBackend::new())), store, WINDOW, TTL)
}

/// Durable store double that counts queries and yields to widen races.
struct CountingStore {
    inner: MemoryMessageStore<ChatMessage>,
    queries: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: MemoryMessageStore::new(),
            queries: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MessageStore<ChatMessage> for CountingStore {
    async fn find_recent(&self, room_id: &str, limit: usize) -> anyhow::Result<Vec<ChatMessage>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        // Hold the query open briefly so concurrent warm-ups overlap
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.inner.find_recent(room_id, limit).await
    }
}

/// Backend double where every operation fails immediately.
struct FailingBackend;

#[async_trait]
impl Backend for FailingBackend {
    async fn exec_batch(&self, _commands: Vec<Command>) -> chat_cache::Result<()> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn range(&self, _key: &str) -> chat_cache::Result<Vec<Vec<u8>>> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn exists(&self, _key: &str) -> chat_cache::Result<bool> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn set_nx(
        &self,
        _key: &str,
        _value: Vec<u8>,
        _ttl: Duration,
    ) -> chat_cache::Result<bool> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> chat_cache::Result<()> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn incr(&self, _key: &str) -> chat_cache::Result<i64> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn get_many(&self, _keys: &[&str]) -> chat_cache::Result<Vec<Option<Vec<u8>>>> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

// == Warm-Up Tests ==

#[tokio::test]
async fn test_warm_up_serves_durable_history_newest_first() {
    let store = Arc::new(MemoryMessageStore::new());
    for i in 0..3 {
        store
            .append("lobby", ChatMessage::new("alice", format!("msg {i}")))
            .await;
    }
    let cache = build_cache(store);

    cache.ensure_warm("lobby").await.unwrap();

    let messages = cache.recent_messages("lobby").await.unwrap();
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["msg 2", "msg 1", "msg 0"]);
}

#[tokio::test]
async fn test_warm_up_caps_population_at_window_size() {
    let store = Arc::new(MemoryMessageStore::new());
    for i in 0..WINDOW + 5 {
        store
            .append("lobby", ChatMessage::new("alice", format!("msg {i}")))
            .await;
    }
    let cache = build_cache(store);

    cache.ensure_warm("lobby").await.unwrap();

    let messages = cache.recent_messages("lobby").await.unwrap();
    assert_eq!(messages.len(), WINDOW);
    assert_eq!(messages[0].content, format!("msg {}", WINDOW + 4));
}

#[tokio::test]
async fn test_warm_up_queries_store_once_per_room() {
    let store = Arc::new(CountingStore::new());
    store
        .inner
        .append("lobby", ChatMessage::new("alice", "hello"))
        .await;
    let cache = MessageCache::new(
        session(Arc::new(MemoryBackend::new())),
        store.clone(),
        WINDOW,
        TTL,
    );

    cache.ensure_warm("lobby").await.unwrap();
    cache.ensure_warm("lobby").await.unwrap();

    assert_eq!(store.queries.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_warm_up_populates_once() {
    let store = Arc::new(CountingStore::new());
    for i in 0..4 {
        store
            .inner
            .append("lobby", ChatMessage::new("alice", format!("msg {i}")))
            .await;
    }
    let cache = Arc::new(MessageCache::new(
        session(Arc::new(MemoryBackend::new())),
        store.clone(),
        WINDOW,
        TTL,
    ));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.ensure_warm("lobby").await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(
        store.queries.load(Ordering::SeqCst),
        1,
        "exactly one caller should query the durable store"
    );
    let messages = cache.recent_messages("lobby").await.unwrap();
    assert_eq!(messages.len(), 4, "window must not be double-populated");
}

// == Accounting Tests ==

#[tokio::test]
async fn test_hit_miss_flow_reports_fifty_percent() {
    let cache = build_cache(Arc::new(MemoryMessageStore::new()));

    assert!(cache.recent_messages("lobby").await.unwrap().is_empty());
    cache
        .record_message("lobby", &ChatMessage::new("bob", "hi"))
        .await
        .unwrap();
    assert_eq!(cache.recent_messages("lobby").await.unwrap().len(), 1);

    let stats = cache.stats().await.unwrap();
    assert_eq!(stats.hit, 1);
    assert_eq!(stats.miss, 1);
    assert_eq!(stats.hit_rate, "50.00%");
}

#[tokio::test]
async fn test_counters_are_shared_across_rooms() {
    let cache = build_cache(Arc::new(MemoryMessageStore::new()));

    cache.recent_messages("room-a").await.unwrap();
    cache.recent_messages("room-b").await.unwrap();

    let stats = cache.stats().await.unwrap();
    assert_eq!(stats.miss, 2);
}

// == Window Lifecycle Tests ==

#[tokio::test]
async fn test_idle_window_expires() {
    let cache = MessageCache::new(
        session(Arc::new(MemoryBackend::new())),
        Arc::new(MemoryMessageStore::new()),
        WINDOW,
        Duration::from_millis(50),
    );

    cache
        .record_message("lobby", &ChatMessage::new("bob", "hi"))
        .await
        .unwrap();
    assert_eq!(cache.recent_messages("lobby").await.unwrap().len(), 1);

    tokio::time::sleep(Duration::from_millis(100)).await;

    // Absence after TTL is indistinguishable from never-created
    assert!(cache.recent_messages("lobby").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_expired_window_can_be_rewarmed() {
    let store = Arc::new(MemoryMessageStore::new());
    store.append("lobby", ChatMessage::new("alice", "old")).await;
    let cache = MessageCache::new(
        session(Arc::new(MemoryBackend::new())),
        store,
        WINDOW,
        Duration::from_millis(50),
    );

    cache.ensure_warm("lobby").await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    cache.ensure_warm("lobby").await.unwrap();
    let messages = cache.recent_messages("lobby").await.unwrap();
    assert_eq!(messages.len(), 1);
}

#[tokio::test]
async fn test_is_window_full_signals_deeper_history() {
    let cache = build_cache(Arc::new(MemoryMessageStore::new()));

    for i in 0..WINDOW + 2 {
        cache
            .record_message("lobby", &ChatMessage::new("bob", format!("m{i}")))
            .await
            .unwrap();
    }

    let window = cache.recent_messages("lobby").await.unwrap();
    assert!(cache.is_window_full(&window));
}

// == Outage Tests ==

#[tokio::test]
async fn test_fail_open_on_backend_outage() {
    let cache: MessageCache<ChatMessage> = MessageCache::new(
        session(Arc::new(FailingBackend)),
        Arc::new(MemoryMessageStore::new()),
        WINDOW,
        TTL,
    );

    let started = std::time::Instant::now();
    let record = cache
        .record_message("lobby", &ChatMessage::new("bob", "hi"))
        .await;
    let read = cache.recent_messages("lobby").await;
    let warm = cache.ensure_warm("lobby").await;
    let stats = cache.stats().await;

    assert!(matches!(record, Err(CacheError::Unavailable(_))));
    assert!(matches!(read, Err(CacheError::Unavailable(_))));
    assert!(matches!(warm, Err(CacheError::Unavailable(_))));
    assert!(matches!(stats, Err(CacheError::Unavailable(_))));
    assert!(
        started.elapsed() < Duration::from_secs(1),
        "outage failures must be fast, not hangs"
    );
}
