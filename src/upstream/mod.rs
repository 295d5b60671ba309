//! Upstream Module
//!
//! HTTP client for the third-party metadata API and image host.

mod client;

pub use client::UpstreamClient;
