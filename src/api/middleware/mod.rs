//! HTTP middleware and extractors for request processing.
//!
//! Provides owner identity extraction and observability middleware.

pub mod owner;
pub mod tracing;
