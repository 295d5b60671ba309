//! Upstream Client Module
//!
//! Thin HTTP client for the metadata API and the image host. All caching
//! and deduplication lives above this layer; requests here go straight out.

use reqwest::header;

use crate::config::Config;
use crate::error::{ProxyError, Result};

// == Upstream Client ==
/// Shared client for both upstream hosts.
#[derive(Debug)]
pub struct UpstreamClient {
    /// Reused connection pool
    http: reqwest::Client,
    /// Metadata API base URL, no trailing slash
    api_base: String,
    /// Image host base URL, no trailing slash
    image_base: String,
    /// Fallback bearer token when the caller sends none
    api_token: Option<String>,
}

impl UpstreamClient {
    // == Constructor ==
    /// Creates a client from the proxy configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: config.api_base_url.trim_end_matches('/').to_string(),
            image_base: config.image_base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        }
    }

    // == Fetch Metadata ==
    /// GETs `path_and_query` from the metadata API and returns the JSON body.
    ///
    /// The caller's `Authorization` header is forwarded when present;
    /// otherwise the configured server-side token is used, if any. A
    /// non-success status becomes an error carrying the upstream status and
    /// body so the handler can relay them.
    pub async fn fetch_metadata(
        &self,
        path_and_query: &str,
        authorization: Option<&str>,
    ) -> Result<String> {
        let url = format!("{}{}", self.api_base, path_and_query);
        tracing::debug!(url = %url, "fetching metadata upstream");

        let mut request = self.http.get(&url);
        match (authorization, &self.api_token) {
            (Some(value), _) => request = request.header(header::AUTHORIZATION, value),
            (None, Some(token)) => request = request.bearer_auth(token),
            (None, None) => {}
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %url, "upstream error response");
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    // == Fetch Image ==
    /// GETs an image from the image host, returning the response unconsumed
    /// so the handler can pipe status, headers, and body through.
    pub async fn fetch_image(&self, path: &str) -> Result<reqwest::Response> {
        let url = format!("{}/{}", self.image_base, path.trim_start_matches('/'));
        tracing::debug!(url = %url, "streaming image upstream");

        Ok(self.http.get(&url).send().await?)
    }
}
