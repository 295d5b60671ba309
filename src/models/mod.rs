//! Models Module
//!
//! Data transfer objects for the proxy's own (non-relayed) responses.

mod responses;

pub use responses::{ErrorResponse, HealthResponse};
