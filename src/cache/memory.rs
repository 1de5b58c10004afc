//! In-process cache backend
//!
//! HashMap storage guarded by a tokio RwLock, with TTL expiry and a capacity
//! bound. Live hits only take the read lock. When full, expired entries are
//! swept first, then the entry closest to expiry is evicted.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::stats::StatsCounters;
use crate::cache::{CacheBackend, CacheEntry, CacheStats, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{Result, UnitError};

type Entries = HashMap<String, CacheEntry>;

// == Memory Cache ==
/// Shared in-process cache. Cloning yields another handle to the same map.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    entries: Arc<RwLock<Entries>>,
    counters: Arc<StatsCounters>,
    max_entries: usize,
}

impl MemoryCache {
    /// Creates an empty cache holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            counters: Arc::new(StatsCounters::default()),
            max_entries: max_entries.max(1),
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        self.sweep_expired(&mut entries)
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        let total_entries = self.entries.read().await.len();
        self.counters.snapshot(total_entries)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn sweep_expired(&self, entries: &mut Entries) -> usize {
        let now = current_timestamp_ms();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - entries.len();
        self.counters.record_expirations(removed);
        removed
    }

    fn evict_soonest_expiring(&self, entries: &mut Entries) -> bool {
        let victim = entries
            .iter()
            .min_by_key(|(_, entry)| entry.expires_at)
            .map(|(key, _)| key.clone());

        match victim {
            Some(key) => {
                entries.remove(&key);
                self.counters.record_eviction();
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired() => {
                    self.counters.record_hit();
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
                None => {
                    self.counters.record_miss();
                    return Ok(None);
                }
            }
        }

        // Expired: re-check under the write lock, a writer may have replaced it
        let mut guard = self.entries.write().await;
        let entries = &mut *guard;
        let live = entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone());

        match live {
            Some(value) => {
                self.counters.record_hit();
                Ok(Some(value))
            }
            None => {
                if entries.remove(key).is_some() {
                    self.counters.record_expirations(1);
                }
                self.counters.record_miss();
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        if key.is_empty() || key.len() > MAX_KEY_LENGTH {
            return Err(UnitError::Cache(format!(
                "Key must be between 1 and {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(UnitError::Cache(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        let mut guard = self.entries.write().await;
        let entries = &mut *guard;

        if !entries.contains_key(key) && entries.len() >= self.max_entries {
            self.sweep_expired(entries);
            if entries.len() >= self.max_entries && !self.evict_soonest_expiring(entries) {
                return Err(UnitError::Cache(
                    "Cache is full and eviction failed".to_string(),
                ));
            }
        }

        // Replace, never merge
        entries.insert(key.to_string(), CacheEntry::new(value, ttl_seconds));
        Ok(())
    }
}
