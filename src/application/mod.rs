//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository and
//! cache calls, validation, and business rules. Services consume the
//! [`crate::domain::repositories::LinkRepository`] and
//! [`crate::infrastructure::cache::CacheService`] traits and provide a clean
//! API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Create, resolve, update and delete short links
//! - [`services::code_generator::CodeGenerator`] - Collision-checked code allocation

pub mod services;
