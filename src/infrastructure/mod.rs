//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and caching.
//!
//! # Modules
//!
//! - [`cache`] - Cache contract with Redis and in-memory implementations
//! - [`persistence`] - PostgreSQL and in-memory link repositories

pub mod cache;
pub mod persistence;
