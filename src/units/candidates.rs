//! Read-through cache of candidate sets
//!
//! Candidate sets are stored serialized under a key derived from
//! (category, order field, count). A miss or an expired entry triggers one
//! store fetch; only complete, valid, non-empty sets are written back.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::CacheBackend;
use crate::error::Result;
use crate::units::{CandidateRecord, CandidateSet, Category};

/// Default lifetime of a cached candidate set, in seconds.
pub const DEFAULT_CANDIDATE_TTL: u64 = 600;

/// Counters describing where candidate sets came from.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CandidateStats {
    pub served_from_cache: u64,
    pub fetched_from_store: u64,
    pub store_failures: u64,
    /// Lifetime given to every cached candidate set
    pub ttl_seconds: u64,
}

#[derive(Debug, Default)]
struct Counters {
    served_from_cache: AtomicU64,
    fetched_from_store: AtomicU64,
    store_failures: AtomicU64,
}

// == Candidate Cache ==
#[derive(Clone)]
pub struct CandidateCache {
    backend: Arc<dyn CacheBackend>,
    key_prefix: String,
    ttl_seconds: u64,
    counters: Arc<Counters>,
}

impl CandidateCache {
    pub fn new(backend: Arc<dyn CacheBackend>, key_prefix: impl Into<String>, ttl_seconds: u64) -> Self {
        Self {
            backend,
            key_prefix: key_prefix.into(),
            ttl_seconds,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Deterministic key for one parameter tuple, shared by every caller.
    pub fn cache_key(&self, category: Category, order_field: &str, count: usize) -> String {
        format!(
            "{}:{}:order:{}:count:{}",
            self.key_prefix, category, order_field, count
        )
    }

    pub fn stats(&self) -> CandidateStats {
        CandidateStats {
            served_from_cache: self.counters.served_from_cache.load(Ordering::Relaxed),
            fetched_from_store: self.counters.fetched_from_store.load(Ordering::Relaxed),
            store_failures: self.counters.store_failures.load(Ordering::Relaxed),
            ttl_seconds: self.ttl_seconds,
        }
    }

    // == Get Or Fetch ==
    /// Returns the cached set for the tuple, or fetches, validates and caches a
    /// fresh one. Never fails: any data problem yields an empty set.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        category: Category,
        order_field: &str,
        count: usize,
        fetch: F,
    ) -> CandidateSet
    where
        F: FnOnce(usize) -> Fut,
        Fut: Future<Output = Result<Vec<CandidateRecord>>>,
    {
        let key = self.cache_key(category, order_field, count);

        if let Some(set) = self.lookup(&key, category, count).await {
            self.counters.served_from_cache.fetch_add(1, Ordering::Relaxed);
            debug!(%category, count, key = %key, "Got candidate list from cache");
            return set;
        }

        let records = match fetch(count).await {
            Ok(records) => records,
            Err(e) => {
                self.counters.store_failures.fetch_add(1, Ordering::Relaxed);
                warn!(%category, count, error = %e, "Candidate store fetch failed");
                return CandidateSet::empty(category);
            }
        };
        self.counters.fetched_from_store.fetch_add(1, Ordering::Relaxed);

        let set = match CandidateSet::new(category, records, count) {
            Ok(set) => set,
            Err(e) => {
                warn!(%category, count, error = %e, "Discarding invalid candidate list");
                return CandidateSet::empty(category);
            }
        };

        if set.is_empty() {
            debug!(%category, count, "Store returned no candidates; not caching");
            return set;
        }

        debug!(
            %category,
            count,
            order_field,
            records = set.len(),
            "Got candidate list from store"
        );
        self.store(&key, &set).await;
        set
    }

    /// Decodes a live cached set. Anything unusable counts as a miss.
    async fn lookup(&self, key: &str, category: Category, count: usize) -> Option<CandidateSet> {
        let raw = match self.backend.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key, error = %e, "Cache read failed; falling back to store");
                return None;
            }
        };

        match serde_json::from_str::<CandidateSet>(&raw) {
            Ok(set)
                if !set.is_empty()
                    && set.category() == category
                    && set.validate(count).is_ok() =>
            {
                Some(set)
            }
            Ok(_) => {
                warn!(key, "Ignoring unusable cached candidate list");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Ignoring corrupt cached candidate list");
                None
            }
        }
    }

    async fn store(&self, key: &str, set: &CandidateSet) {
        let payload = match serde_json::to_string(set) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key, error = %e, "Could not encode candidate list");
                return;
            }
        };

        if let Err(e) = self.backend.set(key, payload, self.ttl_seconds).await {
            warn!(key, error = %e, "Cache write failed");
        }
    }
}
