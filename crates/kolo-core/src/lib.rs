//! Shared application plumbing for the Kolo services.
//!
//! Provides tracing setup, request-id middleware, the legacy response
//! envelope, and the bearer-token extractor.

pub mod bearer;
pub mod envelope;
pub mod middleware;
pub mod serde;
pub mod tracing;
