//! API Handlers
//!
//! HTTP request handlers for the proxy endpoints.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::config::Config;
use crate::error::Result;
use crate::fetch::RequestManager;
use crate::models::HealthResponse;
use crate::upstream::UpstreamClient;

/// Application state shared across all handlers.
///
/// Holds the cache-fronted request manager and the upstream client. Built
/// once at startup and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Cache plus in-flight deduplication for metadata responses
    pub manager: Arc<RequestManager<String>>,
    /// Client for both upstream hosts
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    /// Creates a new AppState from its two collaborators.
    pub fn new(manager: RequestManager<String>, upstream: UpstreamClient) -> Self {
        Self {
            manager: Arc::new(manager),
            upstream: Arc::new(upstream),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        let manager = RequestManager::new(config.max_entries, config.cache_ttl_ms);
        let upstream = UpstreamClient::new(config);
        Self::new(manager, upstream)
    }
}

/// Builds the cache key for a proxied request: path plus query string.
///
/// The caller's identity is deliberately not part of the key; movie
/// metadata is the same for every caller, so the cache is shared.
fn cache_key(path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("/{path}?{q}"),
        _ => format!("/{path}"),
    }
}

/// Handler for GET /*path
///
/// Serves metadata from the cache when possible; otherwise fetches it
/// upstream, with concurrent identical requests coalesced onto one fetch.
pub async fn proxy_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<Response> {
    let key = cache_key(&path, query.as_deref());
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let upstream = Arc::clone(&state.upstream);
    let request_path = key.clone();
    let body = state
        .manager
        .fetch(&key, || async move {
            upstream
                .fetch_metadata(&request_path, authorization.as_deref())
                .await
        })
        .await?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// Handler for GET /image/*path
///
/// Pure passthrough: pipes the upstream status, content type, and body
/// stream without buffering or caching.
pub async fn image_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response> {
    let upstream_response = state.upstream.fetch_image(&path).await?;

    let status = StatusCode::from_u16(upstream_response.status().as_u16())
        .unwrap_or(StatusCode::BAD_GATEWAY);

    let mut response_headers = HeaderMap::new();
    for name in [header::CONTENT_TYPE, header::CACHE_CONTROL] {
        if let Some(value) = upstream_response.headers().get(name.as_str()) {
            if let Ok(value) = HeaderValue::from_bytes(value.as_bytes()) {
                response_headers.insert(name, value);
            }
        }
    }

    let body = Body::from_stream(upstream_response.bytes_stream());
    Ok((status, response_headers, body).into_response())
}

/// Handler for GET /health
///
/// Returns health status of the proxy.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
