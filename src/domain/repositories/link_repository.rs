//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable store for short links.
///
/// The store is the source of truth: the code column is unique, and the
/// persisted click counter is the fallback when no cache counter exists.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - In-memory implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeTaken`] if the code already exists.
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a link by its (normalized) short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ShortLink))` if found
    /// - `Ok(None)` if not found
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Checks whether a code is already stored, without loading the row.
    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError>;

    /// Lists an owner's links, newest first.
    ///
    /// # Arguments
    ///
    /// - `page` - Page number (1-indexed)
    /// - `page_size` - Number of items per page
    ///
    /// # Returns
    ///
    /// The requested page and the owner's total link count.
    async fn find_by_owner_paginated(
        &self,
        owner_id: &str,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<ShortLink>, i64), AppError>;

    /// Replaces the destination and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches `code`.
    async fn update_destination(&self, code: &str, destination: &str)
    -> Result<ShortLink, AppError>;

    /// Adds one to the persisted click counter.
    ///
    /// A missing code is not an error; the click is simply not recorded.
    async fn increment_clicks(&self, code: &str) -> Result<(), AppError>;

    /// Hard-deletes a link owned by `owner_id`.
    ///
    /// Returns `Ok(true)` if a row was removed, `Ok(false)` if none matched.
    async fn delete(&self, code: &str, owner_id: &str) -> Result<bool, AppError>;

    /// Checks if the store is reachable.
    async fn health_check(&self) -> bool;
}
