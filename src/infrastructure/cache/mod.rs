//! Caching layer for code mappings, click counters and create reservations.
//!
//! Provides a [`CacheService`] trait with two implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`MemoryCache`] - In-process cache for single-node runs and tests
//!
//! Keys are always built through [`CacheKey`], which prefixes them with a
//! [`Namespace`] so logical domains sharing one instance never collide.

mod keys;
mod memory_cache;
mod redis_cache;
mod service;

pub use keys::{CacheKey, Namespace};
pub use memory_cache::MemoryCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};

#[cfg(test)]
pub use service::MockCacheService;
