//! In-memory key-value store with LRU eviction and self-expiring locks.
//!
//! Mirrors the Redis store's behavior so the cache-aside layer can run
//! unchanged against either backend within a single process.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::{Mutex, RwLock};

use campus_core::cache::{CacheError, KeyValueStore, LockToken, Result};

/// A single stored value with its expiration.
#[derive(Debug, Clone)]
struct StoredValue {
    value: Vec<u8>,
    expires_at: Instant,
}

impl StoredValue {
    fn new(value: Vec<u8>, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory key-value store.
///
/// Values live in an `LruCache` with lazy expiration (entries are dropped
/// when found expired). Locks live in a separate map so that LRU pressure
/// can never evict a held lock.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    /// Value store with LRU eviction.
    store: Arc<RwLock<LruCache<String, StoredValue>>>,
    /// Held locks: lock key -> (token value, expiry).
    locks: Arc<Mutex<HashMap<String, (String, Instant)>>>,
}

impl MemoryCache {
    /// Creates a new in-memory store with LRU eviction.
    ///
    /// # Panics
    ///
    /// Panics if `max_entries` is 0.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).expect("max_entries must be > 0");
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut store = self.store.write().await;

        match store.get(key) {
            Some(entry) if entry.is_expired() => {
                store.pop(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let mut store = self.store.write().await;
        store.put(key.to_string(), StoredValue::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let store = self.store.read().await;
        Ok(store.peek(key).is_some_and(|entry| !entry.is_expired()))
    }

    async fn delete(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut store = self.store.write().await;
        for key in keys {
            store.pop(key);
        }
        Ok(())
    }

    async fn acquire_lock(&self, key: &str, ttl: Duration) -> Result<Option<LockToken>> {
        let mut locks = self.locks.lock().await;
        let now = Instant::now();

        if let Some((_, expires_at)) = locks.get(key) {
            if now < *expires_at {
                return Ok(None);
            }
        }

        let token = LockToken::generate(key);
        locks.insert(key.to_string(), (token.value().to_string(), now + ttl));
        Ok(Some(token))
    }

    async fn release_lock(&self, token: &LockToken) -> Result<()> {
        let mut locks = self.locks.lock().await;

        match locks.get(token.key()) {
            Some((value, expires_at)) if value == token.value() && Instant::now() < *expires_at => {
                locks.remove(token.key());
                Ok(())
            }
            _ => Err(CacheError::LockNotHeld(token.key().to_string())),
        }
    }
}
