//! Utility functions for code generation and destination validation.
//!
//! - [`code_generator`] - Short code entropy, validation and normalization
//! - [`destination`] - Destination URL validation
//! - [`deadline`] - Time limits for store and cache calls

pub mod code_generator;
pub mod destination;
pub mod deadline;
