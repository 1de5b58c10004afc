//! Configuration Module
//!
//! Handles loading service configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::units::{DisplayFlags, DEFAULT_CANDIDATE_TTL, DEFAULT_UNIT_COUNT};

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// The value is built once at startup and handed to the components that need it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Which built-in categories are eligible for selection
    pub display: DisplayFlags,
    /// Size of the recent-candidate set fetched per category
    pub unit_count: usize,
    /// Thumbnail width in pixels, used by the renderer only
    pub thumbnail_width: u32,
    /// TTL in seconds for cached candidate sets
    pub candidate_ttl: u64,
    /// Namespace prefix for cache keys
    pub cache_key_prefix: String,
    /// Maximum number of entries the in-process cache can hold
    pub max_entries: usize,
    /// Expired-entry sweep interval in seconds
    pub cleanup_interval: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Base URL for links and images in rendered markup
    pub site_url: String,
    /// JSON file used to seed the in-memory candidate store
    pub seed_path: Option<PathBuf>,
    /// Markup returned by the `custom` category, if enabled
    pub custom_fallback_html: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `RANDOM_POLL`, `RANDOM_QUIZ`, `RANDOM_PICTUREGAME` - category flags (default: true)
    /// - `UNIT_COUNT` - candidate set size (default: 10)
    /// - `THUMBNAIL_WIDTH` - thumbnail width (default: 50)
    /// - `CANDIDATE_TTL` - candidate cache TTL in seconds (default: 600)
    /// - `CACHE_KEY_PREFIX` - cache key namespace (default: "gameunit")
    /// - `MAX_ENTRIES` - maximum cache entries (default: 1000)
    /// - `CLEANUP_INTERVAL` - sweep frequency in seconds (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SITE_URL` - base URL for rendered links (default: "http://localhost")
    /// - `SEED_PATH` - optional JSON seed file for the store
    /// - `CUSTOM_FALLBACK_HTML` - optional markup for the `custom` category
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            display: DisplayFlags {
                random_poll: env_parse("RANDOM_POLL").unwrap_or(defaults.display.random_poll),
                random_quiz: env_parse("RANDOM_QUIZ").unwrap_or(defaults.display.random_quiz),
                random_picturegame: env_parse("RANDOM_PICTUREGAME")
                    .unwrap_or(defaults.display.random_picturegame),
            },
            unit_count: env_parse("UNIT_COUNT")
                .filter(|count| *count > 0)
                .unwrap_or(defaults.unit_count),
            thumbnail_width: env_parse("THUMBNAIL_WIDTH").unwrap_or(defaults.thumbnail_width),
            candidate_ttl: env_parse("CANDIDATE_TTL").unwrap_or(defaults.candidate_ttl),
            cache_key_prefix: env::var("CACHE_KEY_PREFIX")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.cache_key_prefix),
            max_entries: env_parse("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            cleanup_interval: env_parse("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            server_port: env_parse("SERVER_PORT").unwrap_or(defaults.server_port),
            site_url: env::var("SITE_URL").ok().unwrap_or(defaults.site_url),
            seed_path: env::var("SEED_PATH").ok().map(PathBuf::from),
            custom_fallback_html: env::var("CUSTOM_FALLBACK_HTML").ok(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayFlags::default(),
            unit_count: DEFAULT_UNIT_COUNT,
            thumbnail_width: 50,
            candidate_ttl: DEFAULT_CANDIDATE_TTL,
            cache_key_prefix: "gameunit".to_string(),
            max_entries: 1000,
            cleanup_interval: 60,
            server_port: 3000,
            site_url: "http://localhost".to_string(),
            seed_path: None,
            custom_fallback_html: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.display.random_poll);
        assert!(config.display.random_quiz);
        assert!(config.display.random_picturegame);
        assert_eq!(config.unit_count, 10);
        assert_eq!(config.candidate_ttl, 600);
        assert_eq!(config.cache_key_prefix, "gameunit");
        assert!(config.seed_path.is_none());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "RANDOM_POLL",
            "RANDOM_QUIZ",
            "RANDOM_PICTUREGAME",
            "UNIT_COUNT",
            "CANDIDATE_TTL",
            "CACHE_KEY_PREFIX",
            "SEED_PATH",
            "CUSTOM_FALLBACK_HTML",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert!(config.display.random_quiz);
        assert_eq!(config.unit_count, 10);
        assert_eq!(config.candidate_ttl, 600);
        assert!(config.custom_fallback_html.is_none());
    }
}
