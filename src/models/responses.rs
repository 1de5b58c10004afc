//! Response DTOs for the game unit API
//!
//! Defines the structure of outgoing JSON response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::units::{CandidateRecord, CandidateSet, CandidateStats, Category};

/// Response body for GET /candidates/:category
#[derive(Debug, Clone, Serialize)]
pub struct CandidatesResponse {
    pub category: Category,
    /// Candidate-set size the picker asks for
    pub limit: usize,
    pub records: Vec<CandidateRecord>,
}

impl CandidatesResponse {
    pub fn new(set: CandidateSet, limit: usize) -> Self {
        Self {
            category: set.category(),
            limit,
            records: set.records().to_vec(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Entries dropped after their TTL lapsed
    pub expirations: u64,
    /// Entries dropped under the capacity bound
    pub evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Candidate sets answered from the cache
    pub served_from_cache: u64,
    /// Candidate sets fetched from the store
    pub fetched_from_store: u64,
    /// Store fetches that failed
    pub store_failures: u64,
    /// TTL applied to cached candidate sets, in seconds
    pub candidate_ttl_seconds: u64,
}

impl StatsResponse {
    pub fn new(cache: &CacheStats, candidates: CandidateStats) -> Self {
        Self {
            hits: cache.hits,
            misses: cache.misses,
            expirations: cache.expirations,
            evictions: cache.evictions,
            total_entries: cache.total_entries,
            hit_rate: cache.hit_rate(),
            served_from_cache: candidates.served_from_cache,
            fetched_from_store: candidates.fetched_from_store,
            store_failures: candidates.store_failures,
            candidate_ttl_seconds: candidates.ttl_seconds,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
