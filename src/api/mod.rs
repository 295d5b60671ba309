//! API Module
//!
//! HTTP handlers and routing for the proxy.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /image/*path` - Binary image passthrough
//! - `GET /*path` - Cached metadata proxy

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
