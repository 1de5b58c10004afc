//! Response models for the game unit API
//!
//! This module defines the DTOs (Data Transfer Objects) serialized into
//! HTTP response bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::{CandidatesResponse, HealthResponse, StatsResponse};
