//! In-memory cache backend implementation.
//!
//! Provides a thread-safe in-memory key-value store with TTL support and
//! self-expiring locks for single-instance deployments.

mod cache;

pub use cache::MemoryCache;
