//! A `MemoryCache` wrapper that counts writes and fails on demand.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use campus_core::cache::{CacheError, KeyValueStore, LockToken, Result};

use crate::cache::MemoryCache;

pub struct FlakyCache {
    inner: MemoryCache,
    sets: AtomicUsize,
    deletes: AtomicUsize,
    ttls: Mutex<Vec<Duration>>,
    set_delay: Option<Duration>,
    pub fail_get: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_lock: AtomicBool,
}

impl FlakyCache {
    pub fn new() -> Self {
        Self {
            inner: MemoryCache::new(1000),
            sets: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            ttls: Mutex::new(Vec::new()),
            set_delay: None,
            fail_get: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            fail_lock: AtomicBool::new(false),
        }
    }

    /// Slows every `set`, widening the window in which other readers race.
    pub fn with_set_delay(mut self, delay: Duration) -> Self {
        self.set_delay = Some(delay);
        self
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    /// Number of successful bulk deletes.
    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn last_ttl(&self) -> Option<Duration> {
        self.ttls.lock().unwrap().last().copied()
    }

    fn down() -> CacheError {
        CacheError::ConnectionFailed("connection refused".to_string())
    }
}

#[async_trait]
impl KeyValueStore for FlakyCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(Self::down());
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        if let Some(delay) = self.set_delay {
            tokio::time::sleep(delay).await;
        }
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.ttls.lock().unwrap().push(ttl);
        self.inner.set(key, value, ttl).await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.inner.exists(key).await
    }

    async fn delete(&self, keys: &[String]) -> Result<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Self::down());
        }
        self.inner.delete(keys).await?;
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn acquire_lock(&self, key: &str, ttl: Duration) -> Result<Option<LockToken>> {
        if self.fail_lock.load(Ordering::SeqCst) {
            return Err(Self::down());
        }
        self.inner.acquire_lock(key, ttl).await
    }

    async fn release_lock(&self, token: &LockToken) -> Result<()> {
        self.inner.release_lock(token).await
    }
}
