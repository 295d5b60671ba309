//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the response cache can hold
    pub max_entries: usize,
    /// TTL in milliseconds applied to every cached response
    pub cache_ttl_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Base URL of the upstream metadata API
    pub api_base_url: String,
    /// Base URL of the upstream image host
    pub image_base_url: String,
    /// Server-side bearer token used when the client sends no Authorization
    /// header
    pub api_token: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL_MS` - Response TTL in milliseconds (default: 600000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `UPSTREAM_API_URL` - Metadata API base (default: https://api.themoviedb.org/3)
    /// - `UPSTREAM_IMAGE_URL` - Image host base (default: https://image.tmdb.org/t/p)
    /// - `UPSTREAM_API_TOKEN` - Optional fallback bearer token
    pub fn from_env() -> Self {
        Self {
            max_entries: env::var("MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            cache_ttl_ms: env::var("CACHE_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600_000),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            api_base_url: env::var("UPSTREAM_API_URL")
                .unwrap_or_else(|_| "https://api.themoviedb.org/3".to_string()),
            image_base_url: env::var("UPSTREAM_IMAGE_URL")
                .unwrap_or_else(|_| "https://image.tmdb.org/t/p".to_string()),
            api_token: env::var("UPSTREAM_API_TOKEN").ok().filter(|v| !v.is_empty()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            cache_ttl_ms: 600_000,
            server_port: 3000,
            cleanup_interval: 60,
            api_base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p".to_string(),
            api_token: None,
        }
    }
}
