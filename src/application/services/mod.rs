//! Business logic services for the application layer.

pub mod code_generator;
pub mod link_service;

pub use code_generator::{CodeGenerator, CodeSource, MAX_GENERATION_ATTEMPTS, RandomCodeSource};
pub use link_service::{LinkService, LinkSettings, MAX_PAGE_SIZE};
