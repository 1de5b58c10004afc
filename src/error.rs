//! Error types for the game unit service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Unit Error Enum ==
/// Unified error type for the game unit service.
///
/// Only `InvalidCategory` is meant to reach callers of the picker; every
/// other variant is absorbed into an empty rendering at the core boundary.
#[derive(Error, Debug)]
pub enum UnitError {
    /// Unknown category identifier, or a category used where it makes no sense
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    /// The authoritative store failed to answer
    #[error("Store error: {0}")]
    Store(String),

    /// The cache backend failed to answer
    #[error("Cache error: {0}")]
    Cache(String),

    /// A cached value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A fetched candidate set broke one of its invariants
    #[error("Invalid candidate set: {0}")]
    InvalidCandidateSet(String),

    /// Configuration value that cannot be used
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for UnitError {
    fn from(err: serde_json::Error) -> Self {
        UnitError::Serialization(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for UnitError {
    fn into_response(self) -> Response {
        let status = match &self {
            UnitError::InvalidCategory(_) => StatusCode::BAD_REQUEST,
            UnitError::Store(_) | UnitError::Cache(_) => StatusCode::SERVICE_UNAVAILABLE,
            UnitError::Serialization(_)
            | UnitError::InvalidCandidateSet(_)
            | UnitError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the game unit service.
pub type Result<T> = std::result::Result<T, UnitError>;
