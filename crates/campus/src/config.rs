use std::{env, time::Duration};

use crate::storage::cached::CachePolicy;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Entity cache TTL in seconds (default: 300)
    pub cache_ttl_seconds: u64,
    /// Aggregate cache TTL in seconds (default: 120)
    pub cache_list_ttl_seconds: u64,
    /// Negative marker TTL in seconds (default: 60)
    pub cache_negative_ttl_seconds: u64,
    /// Read-population lock TTL in seconds (default: 10)
    pub cache_lock_ttl_seconds: u64,
    /// Enrollment write lock TTL in seconds (default: 5)
    pub cache_write_lock_ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10,000)
    /// Note: Only used when the `memory` feature is enabled.
    #[allow(dead_code)]
    pub cache_max_entries: usize,
    /// Path to SQLite database file (default: "campus.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Entity cache TTL in seconds (default: 300)
    /// - `CACHE_LIST_TTL_SECONDS` - Aggregate cache TTL in seconds (default: 120)
    /// - `CACHE_NEGATIVE_TTL_SECONDS` - Negative marker TTL in seconds (default: 60)
    /// - `CACHE_LOCK_TTL_SECONDS` - Population lock TTL in seconds (default: 10)
    /// - `CACHE_WRITE_LOCK_TTL_SECONDS` - Write lock TTL in seconds (default: 5)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `SQLITE_PATH` - SQLite database path (default: "campus.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            cache_ttl_seconds: env_or("CACHE_TTL_SECONDS", 300),
            cache_list_ttl_seconds: env_or("CACHE_LIST_TTL_SECONDS", 120),
            cache_negative_ttl_seconds: env_or("CACHE_NEGATIVE_TTL_SECONDS", 60),
            cache_lock_ttl_seconds: env_or("CACHE_LOCK_TTL_SECONDS", 10),
            cache_write_lock_ttl_seconds: env_or("CACHE_WRITE_LOCK_TTL_SECONDS", 5),
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", 10_000),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "campus.db".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        }
    }

    /// Get the TTLs used by the cached repositories.
    ///
    /// A negative TTL that is not shorter than the entity TTL is capped at
    /// half of it. Locks always live at least one second.
    pub fn cache_policy(&self) -> CachePolicy {
        let entity_ttl = Duration::from_secs(self.cache_ttl_seconds);
        let mut negative_ttl = Duration::from_secs(self.cache_negative_ttl_seconds);
        if negative_ttl >= entity_ttl {
            tracing::warn!(
                negative_ttl_seconds = self.cache_negative_ttl_seconds,
                ttl_seconds = self.cache_ttl_seconds,
                "Negative TTL must be shorter than the entity TTL, capping it"
            );
            negative_ttl = entity_ttl / 2;
        }

        CachePolicy {
            entity_ttl,
            list_ttl: Duration::from_secs(self.cache_list_ttl_seconds),
            negative_ttl,
            lock_ttl: Duration::from_secs(self.cache_lock_ttl_seconds.max(1)),
            write_lock_ttl: Duration::from_secs(self.cache_write_lock_ttl_seconds.max(1)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
