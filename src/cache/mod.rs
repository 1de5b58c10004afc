//! Cache Module
//!
//! The key/value cache interface used by the candidate cache, and an
//! in-process implementation of it with TTL expiration.

mod entry;
mod memory;
mod stats;


use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use entry::CacheEntry;
pub use memory::MemoryCache;
pub use stats::CacheStats;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 250;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Cache Backend ==
/// A shared key/value cache. Implementations may be network-backed, so both
/// operations are async and fallible.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the live value stored under `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value, for `ttl_seconds`.
    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()>;
}
