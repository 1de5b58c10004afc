//! API Module
//!
//! HTTP handlers and routing for the game unit service.
//!
//! # Endpoints
//! - `GET /unit` - Render one random game unit
//! - `GET /candidates/:category` - Current candidate set of a category
//! - `GET /stats` - Cache and store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
