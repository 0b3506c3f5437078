//! Cache service trait and error types.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::keys::CacheKey;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    Unavailable(String),

    #[error("cache operation timed out")]
    Timeout,

    #[error("cache operation error: {0}")]
    Operation(String),

    /// A batch write stored some keys but not these.
    #[error("cache batch write failed for {} key(s)", failed.len())]
    Partial { failed: Vec<String> },
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value cache with per-entry expiry.
///
/// The cache is never the source of truth: a missing entry only means the
/// caller has to consult the durable store. Values are opaque strings; typed
/// values are serialized by the caller.
///
/// Implementations report failures instead of hiding them. Whether a failure
/// matters is decided by the caller (see
/// [`crate::application::services::LinkService`]).
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process cache
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached value, or `None` when nothing is cached.
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<String>>;

    /// Unconditional upsert with expiry.
    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Atomically stores `value` only if `key` holds nothing.
    ///
    /// Returns `true` when this call performed the write.
    async fn set_if_absent(&self, key: &CacheKey, value: &str, ttl: Duration)
    -> CacheResult<bool>;

    async fn delete(&self, key: &CacheKey) -> CacheResult<()>;

    async fn delete_many(&self, keys: &[CacheKey]) -> CacheResult<()>;

    async fn exists(&self, key: &CacheKey) -> CacheResult<bool>;

    /// Fetches several keys at once. Keys with no cached value are absent
    /// from the returned map.
    async fn get_many(&self, keys: &[CacheKey]) -> CacheResult<HashMap<CacheKey, String>>;

    /// Batch upsert with a shared expiry.
    ///
    /// # Errors
    ///
    /// Either the whole batch is applied, or [`CacheError::Partial`] lists the
    /// keys that were not stored.
    async fn set_many(&self, items: &[(CacheKey, String)], ttl: Duration) -> CacheResult<()>;

    /// Increments an integer counter, creating it at zero first if missing.
    async fn increment(&self, key: &CacheKey) -> CacheResult<i64>;

    /// Sets the expiry of an existing key. Returns `false` if the key is missing.
    async fn set_expiry(&self, key: &CacheKey, ttl: Duration) -> CacheResult<bool>;

    /// [`Self::increment`] and [`Self::set_expiry`] applied as one step, so a
    /// counter created by the increment never lives without an expiry.
    async fn increment_with_expiry(&self, key: &CacheKey, ttl: Duration) -> CacheResult<i64>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
