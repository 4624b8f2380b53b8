//! Redis cache backend implementation.
//!
//! Provides a key-value store shared by every instance for multi-instance
//! deployments. Supports connection pooling, per-key TTL and token-checked
//! locks.

mod cache;
mod error;

pub use cache::RedisCache;
