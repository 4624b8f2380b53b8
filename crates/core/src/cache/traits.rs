use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use super::{
    deserialize_entry, jittered_duration, serialize_entry, CacheEntry, CacheError, LockToken,
    Result,
};

/// Remote key-value store backing the cache-aside layer.
///
/// Every method is a round trip to the store; implementations keep no local
/// copy of values. The store is shared by every process, so these operations
/// are the only coordination point between them.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Gets the raw bytes stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, expiring after `ttl`. Overwrites any existing entry.
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Returns true if a live entry exists under `key`.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Deletes every key in `keys`. Absent keys are ignored.
    async fn delete(&self, keys: &[String]) -> Result<()>;

    /// Makes one attempt to take the lock at `key`, self-expiring after `ttl`.
    ///
    /// Returns `Ok(None)` when another holder has it. Never waits or retries.
    async fn acquire_lock(&self, key: &str, ttl: Duration) -> Result<Option<LockToken>>;

    /// Releases a lock previously acquired with `token`.
    ///
    /// Fails with [`CacheError::LockNotHeld`] if the lock has expired or
    /// belongs to another holder; the other holder's lock is left intact.
    async fn release_lock(&self, token: &LockToken) -> Result<()>;

    /// Returns a TTL spread around `base` to desynchronize expiries.
    fn jittered_duration(&self, base: Duration) -> Duration {
        jittered_duration(base)
    }
}

/// Typed access to [`CacheEntry`] documents on top of a [`KeyValueStore`].
#[async_trait]
pub trait KeyValueStoreExt: KeyValueStore {
    /// Serializes `entry` and stores it under `key` for `ttl`.
    async fn set_entry<T>(&self, key: &str, entry: &CacheEntry<T>, ttl: Duration) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let bytes =
            serialize_entry(entry).map_err(|e| CacheError::Serialization(e.to_string()))?;
        self.set(key, &bytes, ttl).await
    }

    /// Reads and deserializes the entry under `key`.
    ///
    /// Fails with [`CacheError::NotFound`] when there is no live entry and
    /// with [`CacheError::Corrupt`] when the bytes do not decode as `T`.
    async fn get_entry<T>(&self, key: &str) -> Result<CacheEntry<T>>
    where
        T: DeserializeOwned + Send,
    {
        let bytes = self
            .get(key)
            .await?
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        deserialize_entry(&bytes).map_err(|e| CacheError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

impl<S: KeyValueStore> KeyValueStoreExt for S {}
