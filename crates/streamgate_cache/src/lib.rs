//! Key/value caching with per-entry TTL.
//!
//! This crate provides the process-wide cache used to skip upstream calls
//! when a file descriptor for an archived message was already computed.

#![warn(missing_docs)]

mod cache;
mod clock;

pub use cache::{CacheConfig, CacheConfigBuilder, CacheEntry, TtlCache};
pub use clock::{Clock, ManualClock, SystemClock};
