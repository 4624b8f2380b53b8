//! Cached repository decorators.
//!
//! Each decorator wraps a system-of-record repository with the cache-aside
//! pattern implemented by [`CacheAside`]:
//!
//! - **Reads**: check the cache, on a miss fetch from the repository and
//!   populate under a single-attempt lock
//! - **Writes**: persist to the repository, then delete every affected key
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! let repo = Arc::new(SqliteRepository::new("campus.db").await?);
//! let cache = Arc::new(MemoryCache::new(10_000));
//!
//! let courses = CachedCourseRepository::new(repo, cache, CachePolicy::default());
//! ```

use std::time::Duration;

mod aside;
mod course;
mod enrollment;
#[cfg(test)]
mod test_support;
mod todo;
mod user;

pub use aside::{CacheAside, ReadPolicy};
pub use course::CachedCourseRepository;
pub use enrollment::CachedEnrollmentRepository;
pub use todo::CachedTodoRepository;
pub use user::CachedUserRepository;

/// TTLs used by the cached repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Base TTL for single entities (`course:{id}`, `user:*`).
    pub entity_ttl: Duration,
    /// Base TTL for aggregates (`course:all`, enrollments, boards).
    pub list_ttl: Duration,
    /// TTL of negative markers. Shorter than `entity_ttl`.
    pub negative_ttl: Duration,
    /// Expiry of read-population locks.
    pub lock_ttl: Duration,
    /// Expiry of enrollment write locks.
    pub write_lock_ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            entity_ttl: Duration::from_secs(300),
            list_ttl: Duration::from_secs(120),
            negative_ttl: Duration::from_secs(60),
            lock_ttl: Duration::from_secs(10),
            write_lock_ttl: Duration::from_secs(5),
        }
    }
}

impl CachePolicy {
    pub fn entity(&self) -> ReadPolicy {
        ReadPolicy {
            ttl: self.entity_ttl,
            negative_ttl: None,
        }
    }

    pub fn entity_with_negative(&self) -> ReadPolicy {
        ReadPolicy {
            ttl: self.entity_ttl,
            negative_ttl: Some(self.negative_ttl),
        }
    }

    pub fn list(&self) -> ReadPolicy {
        ReadPolicy {
            ttl: self.list_ttl,
            negative_ttl: None,
        }
    }
}
