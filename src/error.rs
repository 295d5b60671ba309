//! Error types for the proxy
//!
//! Provides unified error handling using thiserror.
//!
//! Errors are `Clone` so that a single upstream failure can be fanned out to
//! every caller coalesced onto the same in-flight request.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Proxy Error Enum ==
/// Unified error type for the proxy.
#[derive(Error, Debug, Clone)]
pub enum ProxyError {
    /// Upstream answered with a non-success status
    #[error("Upstream responded {status}")]
    Upstream { status: u16, body: String },

    /// The upstream request itself failed (connect, DNS, body read, ...)
    #[error("Upstream request failed: {0}")]
    Network(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        ProxyError::Network(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            // Relay the upstream status and body verbatim; the upstream
            // speaks JSON, including for its error payloads.
            ProxyError::Upstream { status, body } => {
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (
                    status,
                    [(header::CONTENT_TYPE, "application/json")],
                    body,
                )
                    .into_response()
            }
            ProxyError::Network(msg) => {
                let body = Json(ErrorResponse::new(msg));
                (StatusCode::BAD_GATEWAY, body).into_response()
            }
            ProxyError::Internal(msg) => {
                let body = Json(ErrorResponse::new(msg));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
