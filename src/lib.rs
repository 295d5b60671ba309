//! Movie Proxy - a caching reverse proxy for a movie metadata API
//!
//! Forwards GET requests to an upstream metadata API with an in-memory
//! TTL+LRU response cache and in-flight request coalescing, plus an
//! uncached binary passthrough for images.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
