#![allow(dead_code)]

use async_trait::async_trait;
use shortlink_resolver::application::services::{CodeSource, LinkService, LinkSettings};
use shortlink_resolver::domain::click_worker::{
    ClickDispatcher, ClickWorkerSettings, run_click_worker,
};
use shortlink_resolver::domain::repositories::LinkRepository;
use shortlink_resolver::infrastructure::cache::{
    CacheError, CacheKey, CacheResult, CacheService, MemoryCache,
};
use shortlink_resolver::infrastructure::persistence::MemoryLinkRepository;
use shortlink_resolver::state::AppState;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const OWNER: &str = "owner-1";
pub const OTHER_OWNER: &str = "owner-2";
pub const BASE_URL: &str = "https://s.example.com";

/// A cache whose every call fails, as if the server were unreachable.
#[derive(Debug, Default)]
pub struct FailingCache;

fn down<T>() -> CacheResult<T> {
    Err(CacheError::Unavailable("connection refused".to_string()))
}

#[async_trait]
impl CacheService for FailingCache {
    async fn get(&self, _key: &CacheKey) -> CacheResult<Option<String>> {
        down()
    }

    async fn set(&self, _key: &CacheKey, _value: &str, _ttl: Duration) -> CacheResult<()> {
        down()
    }

    async fn set_if_absent(
        &self,
        _key: &CacheKey,
        _value: &str,
        _ttl: Duration,
    ) -> CacheResult<bool> {
        down()
    }

    async fn delete(&self, _key: &CacheKey) -> CacheResult<()> {
        down()
    }

    async fn delete_many(&self, _keys: &[CacheKey]) -> CacheResult<()> {
        down()
    }

    async fn exists(&self, _key: &CacheKey) -> CacheResult<bool> {
        down()
    }

    async fn get_many(&self, _keys: &[CacheKey]) -> CacheResult<HashMap<CacheKey, String>> {
        down()
    }

    async fn set_many(&self, _items: &[(CacheKey, String)], _ttl: Duration) -> CacheResult<()> {
        down()
    }

    async fn increment(&self, _key: &CacheKey) -> CacheResult<i64> {
        down()
    }

    async fn set_expiry(&self, _key: &CacheKey, _ttl: Duration) -> CacheResult<bool> {
        down()
    }

    async fn increment_with_expiry(&self, _key: &CacheKey, _ttl: Duration) -> CacheResult<i64> {
        down()
    }

    async fn health_check(&self) -> bool {
        false
    }
}

/// Always proposes the same code.
pub struct FixedCode(pub &'static str);

impl CodeSource for FixedCode {
    fn draw(&self, _length: usize) -> Result<String, getrandom::Error> {
        Ok(self.0.to_string())
    }
}

/// A fully wired service over in-memory backends, with a running click worker.
pub struct TestApp {
    pub service: Arc<LinkService<dyn LinkRepository>>,
    pub repository: Arc<MemoryLinkRepository>,
    pub cache: Arc<dyn CacheService>,
    pub worker: JoinHandle<()>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_cache(Arc::new(MemoryCache::new()))
    }

    pub fn with_cache(cache: Arc<dyn CacheService>) -> Self {
        Self::build(cache, None)
    }

    pub fn with_code_source(source: Box<dyn CodeSource>) -> Self {
        Self::build(Arc::new(MemoryCache::new()), Some(source))
    }

    fn build(cache: Arc<dyn CacheService>, source: Option<Box<dyn CodeSource>>) -> Self {
        let repository = Arc::new(MemoryLinkRepository::new());
        let dyn_repository: Arc<dyn LinkRepository> = repository.clone();

        let (dispatcher, rx) = ClickDispatcher::channel(1_000);
        let worker = tokio::spawn(run_click_worker(
            rx,
            dyn_repository.clone(),
            cache.clone(),
            ClickWorkerSettings::default(),
        ));

        let mut service = LinkService::new(
            dyn_repository,
            cache.clone(),
            dispatcher,
            LinkSettings::default(),
        );
        if let Some(source) = source {
            service = service.with_code_source(source);
        }

        Self {
            service: Arc::new(service),
            repository,
            cache,
            worker,
        }
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.service.clone(), BASE_URL)
    }

    pub async fn stored_clicks(&self, code: &str) -> i64 {
        self.repository
            .find_by_code(code)
            .await
            .unwrap()
            .map(|link| link.clicks)
            .unwrap_or(0)
    }

    pub async fn cached_clicks(&self, code: &str) -> Option<i64> {
        self.cache
            .get(&CacheKey::clicks(code))
            .await
            .ok()
            .flatten()
            .and_then(|v| v.parse().ok())
    }

    /// Polls until both click counters reach `expected` or two seconds pass.
    pub async fn wait_for_clicks(&self, code: &str, expected: i64) -> (i64, Option<i64>) {
        for _ in 0..200 {
            let stored = self.stored_clicks(code).await;
            let cached = self.cached_clicks(code).await;
            if stored >= expected && cached.is_none_or(|c| c >= expected) {
                return (stored, cached);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        (self.stored_clicks(code).await, self.cached_clicks(code).await)
    }
}
