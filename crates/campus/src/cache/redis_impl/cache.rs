//! Redis key-value store.
//!
//! Values are stored with millisecond TTLs. Locks are plain keys holding
//! the holder's token, taken with `SET NX PX` and released by a Lua
//! compare-and-delete so a stale holder can never delete a newer lock.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use campus_core::cache::{CacheError, KeyValueStore, LockToken, Result};

use super::error::map_redis_error;

/// Deletes KEYS[1] only if it still holds ARGV[1]. Returns the number of keys removed.
const RELEASE_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

/// Redis key-value store using connection manager for pooling.
pub struct RedisCache {
    conn: redis::aio::ConnectionManager,
    release: redis::Script,
}

impl RedisCache {
    /// Creates a new Redis connection.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379")
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be established.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let conn = redis::aio::ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;
        Ok(Self {
            conn,
            release: redis::Script::new(RELEASE_SCRIPT),
        })
    }
}

/// Redis rejects a zero expiry, so sub-millisecond TTLs round up.
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl KeyValueStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let result: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.pset_ex::<_, _, ()>(key, value, ttl_millis(ttl))
            .await
            .map_err(map_redis_error)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        conn.exists::<_, bool>(key).await.map_err(map_redis_error)
    }

    async fn delete(&self, keys: &[String]) -> Result<()> {
        // DEL with no arguments is a Redis error.
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(keys).await.map_err(map_redis_error)
    }

    async fn acquire_lock(&self, key: &str, ttl: Duration) -> Result<Option<LockToken>> {
        let mut conn = self.conn.clone();
        let token = LockToken::generate(key);

        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(token.value())
            .arg("NX")
            .arg("PX")
            .arg(ttl_millis(ttl))
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        Ok(reply.map(|_| token))
    }

    async fn release_lock(&self, token: &LockToken) -> Result<()> {
        let mut conn = self.conn.clone();
        let removed: i64 = self
            .release
            .key(token.key())
            .arg(token.value())
            .invoke_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        if removed == 1 {
            Ok(())
        } else {
            Err(CacheError::LockNotHeld(token.key().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::cache::{lock_key, CacheEntry, KeyValueStoreExt};
    use campus_core::school::Course;

    /// Helper to get Redis URL from environment.
    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    /// Skip test if Redis not available.
    async fn get_test_cache() -> Option<RedisCache> {
        let cache = RedisCache::new(&redis_url()).await.ok()?;
        // The connection manager connects lazily on some failures; probe once.
        cache.exists("test:probe").await.ok()?;
        Some(cache)
    }

    /// Generate a unique test key to avoid conflicts.
    fn test_key(suffix: &str) -> String {
        format!("test:redis_cache:{}:{}", rand::random::<u64>(), suffix)
    }

    #[test]
    fn test_ttl_millis_never_zero() {
        assert_eq!(ttl_millis(Duration::ZERO), 1);
        assert_eq!(ttl_millis(Duration::from_micros(10)), 1);
        assert_eq!(ttl_millis(Duration::from_secs(2)), 2000);
    }

    #[tokio::test]
    async fn test_redis_set_get_exists_delete() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("set_get");
        cache
            .set(&key, b"hello world", Duration::from_secs(30))
            .await
            .unwrap();

        assert_eq!(cache.get(&key).await.unwrap(), Some(b"hello world".to_vec()));
        assert!(cache.exists(&key).await.unwrap());

        cache.delete(&[key.clone()]).await.unwrap();
        assert!(!cache.exists(&key).await.unwrap());
        // Idempotent
        cache.delete(&[key.clone()]).await.unwrap();
        cache.delete(&[]).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_ttl() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("ttl");
        cache
            .set(&key, b"expiring value", Duration::from_millis(200))
            .await
            .unwrap();
        assert!(cache.get(&key).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(cache.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_redis_typed_entry() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("course");
        let course = Course::new("Distributed Systems", 25).with_id(11);
        cache
            .set_entry(&key, &CacheEntry::Present(course.clone()), Duration::from_secs(30))
            .await
            .unwrap();

        assert_eq!(
            cache.get_entry::<Course>(&key).await.unwrap(),
            CacheEntry::Present(course)
        );

        cache.delete(&[key]).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_lock_exclusive_and_token_checked() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = lock_key(&test_key("locked"));
        let token = cache
            .acquire_lock(&key, Duration::from_secs(10))
            .await
            .unwrap()
            .unwrap();
        assert!(cache
            .acquire_lock(&key, Duration::from_secs(10))
            .await
            .unwrap()
            .is_none());

        let forged = LockToken::generate(key.clone());
        assert!(matches!(
            cache.release_lock(&forged).await,
            Err(CacheError::LockNotHeld(_))
        ));

        cache.release_lock(&token).await.unwrap();
        assert!(matches!(
            cache.release_lock(&token).await,
            Err(CacheError::LockNotHeld(_))
        ));
    }

    #[tokio::test]
    async fn test_redis_lock_self_expires() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = lock_key(&test_key("expiring"));
        let _abandoned = cache
            .acquire_lock(&key, Duration::from_millis(100))
            .await
            .unwrap()
            .unwrap();

        tokio::time::sleep(Duration::from_millis(250)).await;

        let token = cache
            .acquire_lock(&key, Duration::from_secs(10))
            .await
            .unwrap()
            .unwrap();
        cache.release_lock(&token).await.unwrap();
    }
}
