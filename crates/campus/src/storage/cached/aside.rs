//! Cache-aside read and write protocols shared by the cached repositories.
//!
//! Reads check the cache, fall back to the system of record on a miss and
//! populate the cache only if they win a single non-blocking lock attempt.
//! Writes optionally take a write lock, run the mutation, then delete every
//! affected key. Cache failures degrade to system-of-record-only behavior;
//! they never fail a read and never roll back a committed write.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use campus_core::cache::{
    lock_key, CacheEntry, CacheError, KeyValueStore, KeyValueStoreExt, LockToken,
};
use campus_core::storage::{RepositoryError, Result};

use super::CachePolicy;

/// How long a read result stays cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadPolicy {
    /// Base TTL for a found value. Jittered on every population.
    pub ttl: Duration,
    /// TTL of the negative marker written when the system of record has no
    /// row. `None` disables negative caching.
    pub negative_ttl: Option<Duration>,
}

/// Cache-aside engine over a [`KeyValueStore`].
pub struct CacheAside<C> {
    cache: Arc<C>,
    lock_ttl: Duration,
    write_lock_ttl: Duration,
}

impl<C> Clone for CacheAside<C> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            lock_ttl: self.lock_ttl,
            write_lock_ttl: self.write_lock_ttl,
        }
    }
}

impl<C: KeyValueStore> CacheAside<C> {
    pub fn new(cache: Arc<C>, policy: &CachePolicy) -> Self {
        Self {
            cache,
            lock_ttl: policy.lock_ttl,
            write_lock_ttl: policy.write_lock_ttl,
        }
    }

    /// Reads `key` through the cache, loading from the system of record on a miss.
    pub async fn read<T, Fut>(&self, key: &str, policy: ReadPolicy, load: Fut) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        Fut: Future<Output = Result<Option<T>>> + Send,
    {
        self.read_aliased(key, policy, load, |_| vec![key.to_string()])
            .await
    }

    /// Like [`read`](Self::read), but a loaded value is stored under every
    /// key returned by `keys_for`. The first of those keys names the
    /// population lock, so concurrent reads through different aliases of
    /// the same entity still populate once.
    pub async fn read_aliased<T, Fut, K>(
        &self,
        key: &str,
        policy: ReadPolicy,
        load: Fut,
        keys_for: K,
    ) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        Fut: Future<Output = Result<Option<T>>> + Send,
        K: FnOnce(&T) -> Vec<String> + Send,
    {
        match self.lookup::<T>(key).await {
            Some(CacheEntry::Present(value)) => return Ok(Some(value)),
            Some(CacheEntry::Absent) => return Ok(None),
            None => {}
        }

        let loaded = load.await?;

        match &loaded {
            Some(value) => {
                let keys = keys_for(value);
                self.populate(&keys, &CacheEntry::Present(value), policy.ttl)
                    .await;
            }
            None => {
                if let Some(ttl) = policy.negative_ttl {
                    self.populate(&[key.to_string()], &CacheEntry::<&T>::Absent, ttl)
                        .await;
                }
            }
        }

        Ok(loaded)
    }

    /// Runs `mutation` under the optional write lock and invalidates the
    /// keys `affected` returns for its result.
    ///
    /// Fails with `Busy` without running the mutation when the write lock
    /// is held elsewhere. A failed mutation touches no cache key. When the
    /// mutation commits but invalidation fails, returns
    /// `CacheInvalidationFailed`; the mutation stays committed.
    pub async fn write<T, Fut, K>(
        &self,
        write_lock: Option<&str>,
        mutation: Fut,
        affected: K,
    ) -> Result<T>
    where
        T: Send,
        Fut: Future<Output = Result<T>> + Send,
        K: FnOnce(&T) -> Vec<String> + Send,
    {
        let token = match write_lock {
            Some(lock) => match self.cache.acquire_lock(lock, self.write_lock_ttl).await {
                Ok(Some(token)) => Some(token),
                Ok(None) => {
                    tracing::debug!(lock = %lock, "Write lock held elsewhere");
                    return Err(RepositoryError::Busy {
                        resource: lock.to_string(),
                    });
                }
                Err(err) => {
                    // The transaction still enforces the invariants.
                    tracing::warn!(lock = %lock, error = %err, "Write lock unavailable, proceeding without it");
                    None
                }
            },
            None => None,
        };

        let result = match mutation.await {
            Ok(value) => {
                let keys = affected(&value);
                self.invalidate(&keys).await.map(|()| value)
            }
            Err(err) => Err(err),
        };

        if let Some(token) = token {
            self.release(&token).await;
        }

        result
    }

    /// Stores a freshly created value under `keys` without taking a lock.
    ///
    /// Failures are logged and otherwise ignored; the next read repopulates.
    pub async fn write_through<T>(&self, keys: &[String], value: &T, ttl: Duration)
    where
        T: Serialize + Sync,
    {
        let ttl = self.cache.jittered_duration(ttl);
        let entry = CacheEntry::Present(value);
        for key in keys {
            if let Err(err) = self.cache.set_entry(key, &entry, ttl).await {
                tracing::warn!(key = %key, error = %err, "Failed to write through to cache");
                return;
            }
        }
    }

    /// Gets the entry at `key`. Misses, corrupt entries and cache failures all yield `None`.
    async fn lookup<T>(&self, key: &str) -> Option<CacheEntry<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.cache.get_entry::<T>(key).await {
            Ok(entry) => {
                tracing::trace!(key = %key, absent = entry.is_absent(), "Cache hit");
                Some(entry)
            }
            Err(CacheError::NotFound(_)) => {
                tracing::trace!(key = %key, "Cache miss");
                None
            }
            Err(err @ CacheError::Corrupt { .. }) => {
                tracing::warn!(key = %key, error = %err, "Corrupt cache entry, treating as miss");
                None
            }
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Cache read failed, falling back to storage");
                None
            }
        }
    }

    /// Stores `entry` under every key in `keys` if the population lock for
    /// the first key can be taken in one attempt.
    async fn populate<V>(&self, keys: &[String], entry: &CacheEntry<V>, ttl: Duration)
    where
        V: Serialize + Sync,
    {
        let Some(subject) = keys.first() else {
            return;
        };
        let lock = lock_key(subject);

        let token = match self.cache.acquire_lock(&lock, self.lock_ttl).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::trace!(key = %subject, "Population lock held elsewhere, skipping");
                return;
            }
            Err(err) => {
                tracing::warn!(key = %subject, error = %err, "Population lock unavailable, skipping");
                return;
            }
        };

        let ttl = self.cache.jittered_duration(ttl);
        for key in keys {
            if let Err(err) = self.cache.set_entry(key, entry, ttl).await {
                tracing::warn!(key = %key, error = %err, "Failed to populate cache");
                break;
            }
        }
        tracing::trace!(key = %subject, ttl_ms = ttl.as_millis() as u64, "Cache populated");

        self.release(&token).await;
    }

    async fn invalidate(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        match self.cache.delete(keys).await {
            Ok(()) => {
                tracing::debug!(keys = ?keys, "Invalidated cache keys");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(keys = ?keys, error = %err, "Cache invalidation failed after commit");
                Err(RepositoryError::CacheInvalidationFailed {
                    keys: keys.to_vec(),
                    reason: err.to_string(),
                })
            }
        }
    }

    async fn release(&self, token: &LockToken) {
        match self.cache.release_lock(token).await {
            Ok(()) => {}
            Err(CacheError::LockNotHeld(_)) => {
                tracing::debug!(lock = %token, "Lock expired before release");
            }
            Err(err) => {
                tracing::warn!(lock = %token, error = %err, "Failed to release lock, it will expire");
            }
        }
    }
}
