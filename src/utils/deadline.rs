//! Time limits for store and cache calls.

use std::future::Future;
use std::time::Duration;

use crate::error::AppError;
use crate::infrastructure::cache::{CacheError, CacheResult};

/// Per-call time limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    /// Every durable store call made on behalf of a request.
    pub store: Duration,
    /// Every cache call.
    pub cache: Duration,
    /// The background durable click increment, independent of any request.
    pub click_persist: Duration,
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            store: Duration::from_secs(2),
            cache: Duration::from_millis(250),
            click_persist: Duration::from_secs(5),
        }
    }
}

/// Runs a store call, failing with [`AppError::Timeout`] once `limit` elapses.
pub async fn store_call<T, F>(limit: Duration, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| AppError::Timeout("store"))?
}

/// Runs a cache call, failing with [`CacheError::Timeout`] once `limit` elapses.
pub async fn cache_call<T, F>(limit: Duration, fut: F) -> CacheResult<T>
where
    F: Future<Output = CacheResult<T>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| CacheError::Timeout)?
}
