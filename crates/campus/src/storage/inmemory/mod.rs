//! In-memory storage backend for development and tests.
//!
//! Implements every repository trait over maps guarded by a single
//! `Arc<RwLock<_>>`, which stands in for the relational store's
//! transactions.
//!
//! # Example
//!
//! ```rust,ignore
//! use campus::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! ```

mod repository;

pub use repository::InMemoryRepository;
