//! In-process cache backed by a concurrent hash map.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use super::keys::CacheKey;
use super::service::{CacheError, CacheResult, CacheService};

#[derive(Debug, Clone)]
struct CachedValue {
    value: String,
    expires_at: Option<Instant>,
}

impl CachedValue {
    fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Some(Instant::now() + ttl),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Cache living in process memory.
///
/// Used when Redis is not configured and by tests. Expired entries are
/// dropped lazily on access. Per-key atomicity comes from the map's entry
/// locks, so [`CacheService::set_if_absent`] and
/// [`CacheService::increment_with_expiry`] are race-free.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, CachedValue>,
}

impl MemoryCache {
    pub fn new() -> Self {
        debug!("Using MemoryCache");
        Self::default()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.iter().filter(|e| !e.is_expired(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn live_value(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key)
            && !entry.is_expired(now)
        {
            return Some(entry.value.clone());
        }
        self.entries.remove_if(key, |_, v| v.is_expired(now));
        None
    }

    fn bump(&self, key: &CacheKey, ttl: Option<Duration>) -> CacheResult<i64> {
        let now = Instant::now();
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| CachedValue {
                value: "0".to_string(),
                expires_at: None,
            });

        if entry.is_expired(now) {
            entry.value = "0".to_string();
            entry.expires_at = None;
        }

        let current: i64 = entry.value.parse().map_err(|_| {
            CacheError::Operation(format!("value at {} is not an integer", key))
        })?;
        let next = current + 1;
        entry.value = next.to_string();
        if let Some(ttl) = ttl {
            entry.expires_at = Some(now + ttl);
        }

        Ok(next)
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<String>> {
        Ok(self.live_value(&key.to_string()))
    }

    async fn set(&self, key: &CacheKey, value: &str, ttl: Duration) -> CacheResult<()> {
        self.entries
            .insert(key.to_string(), CachedValue::new(value.to_string(), ttl));
        Ok(())
    }

    async fn set_if_absent(
        &self,
        key: &CacheKey,
        value: &str,
        ttl: Duration,
    ) -> CacheResult<bool> {
        let now = Instant::now();
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_expired(now) {
                    occupied.insert(CachedValue::new(value.to_string(), ttl));
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CachedValue::new(value.to_string(), ttl));
                Ok(true)
            }
        }
    }

    async fn delete(&self, key: &CacheKey) -> CacheResult<()> {
        self.entries.remove(&key.to_string());
        Ok(())
    }

    async fn delete_many(&self, keys: &[CacheKey]) -> CacheResult<()> {
        for key in keys {
            self.entries.remove(&key.to_string());
        }
        Ok(())
    }

    async fn exists(&self, key: &CacheKey) -> CacheResult<bool> {
        Ok(self.live_value(&key.to_string()).is_some())
    }

    async fn get_many(&self, keys: &[CacheKey]) -> CacheResult<HashMap<CacheKey, String>> {
        Ok(keys
            .iter()
            .filter_map(|key| {
                self.live_value(&key.to_string())
                    .map(|value| (key.clone(), value))
            })
            .collect())
    }

    async fn set_many(&self, items: &[(CacheKey, String)], ttl: Duration) -> CacheResult<()> {
        for (key, value) in items {
            self.entries
                .insert(key.to_string(), CachedValue::new(value.clone(), ttl));
        }
        Ok(())
    }

    async fn increment(&self, key: &CacheKey) -> CacheResult<i64> {
        self.bump(key, None)
    }

    async fn set_expiry(&self, key: &CacheKey, ttl: Duration) -> CacheResult<bool> {
        let now = Instant::now();
        match self.entries.get_mut(&key.to_string()) {
            Some(mut entry) if !entry.is_expired(now) => {
                entry.expires_at = Some(now + ttl);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn increment_with_expiry(&self, key: &CacheKey, ttl: Duration) -> CacheResult<i64> {
        self.bump(key, Some(ttl))
    }

    async fn health_check(&self) -> bool {
        true
    }
}
