//! Random Game Unit - picks and renders one random poll, quiz or picture game
//!
//! Candidates are the most recent records of each category, served through a
//! TTL read-through cache in front of the authoritative store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod units;

pub use api::AppState;
pub use config::Config;
pub use error::{Result, UnitError};
pub use tasks::spawn_cleanup_task;
pub use units::{DisplayFlags, UnitPicker};
