//! Functional core for the campus course-management backend.
//!
//! Pure types, traits and functions shared by the server: the key-value
//! store abstraction used by the cache-aside layer, the system-of-record
//! repository contracts, the domain model and token claims. No I/O lives
//! here.

pub mod auth;
pub mod cache;
pub mod school;
pub mod storage;
