//! Short link creation, resolution and management service.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::code_generator::{CodeGenerator, CodeSource};
use crate::domain::click_worker::ClickDispatcher;
use crate::domain::entities::{ClickSource, LinkStats, NewShortLink, Page, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheKey, CacheService};
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, is_code_charset, normalize_code};
use crate::utils::deadline::{Deadlines, cache_call, store_call};
use crate::utils::destination::validate_destination;

/// Largest page size accepted by [`LinkService::list_links`].
pub const MAX_PAGE_SIZE: i64 = 100;

/// Tuning for [`LinkService`].
#[derive(Debug, Clone, Copy)]
pub struct LinkSettings {
    /// Length of generated codes.
    pub code_length: usize,
    /// Expiry of cached code → destination mappings.
    pub url_ttl: Duration,
    /// Expiry of create reservations.
    pub reservation_ttl: Duration,
    pub deadlines: Deadlines,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            url_ttl: Duration::from_secs(24 * 60 * 60),
            reservation_ttl: Duration::from_secs(30),
            deadlines: Deadlines::default(),
        }
    }
}

/// Service for creating, resolving and managing short links.
///
/// The durable store is authoritative; the cache only speeds up reads and
/// holds near-real-time click counters. Cache writes are best-effort and
/// cache read failures fall back to the store. The one exception is
/// [`Self::delete`], which reports a failed cache cleanup.
pub struct LinkService<R: LinkRepository + ?Sized> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
    generator: CodeGenerator<R>,
    clicks: ClickDispatcher,
    settings: LinkSettings,
}

impl<R: LinkRepository + ?Sized> LinkService<R> {
    /// Creates a new link service.
    pub fn new(
        repository: Arc<R>,
        cache: Arc<dyn CacheService>,
        clicks: ClickDispatcher,
        settings: LinkSettings,
    ) -> Self {
        let generator = CodeGenerator::new(
            repository.clone(),
            cache.clone(),
            settings.code_length,
            settings.reservation_ttl,
            settings.deadlines,
        );

        Self {
            repository,
            cache,
            generator,
            clicks,
            settings,
        }
    }

    /// Replaces the entropy source used for generated codes.
    pub fn with_code_source(mut self, source: Box<dyn CodeSource>) -> Self {
        self.generator = self.generator.with_source(source);
        self
    }

    pub fn click_dispatcher(&self) -> &ClickDispatcher {
        &self.clicks
    }

    /// Creates a short link.
    ///
    /// A missing or empty `custom_code` means "generate one". Any other value,
    /// including whitespace, is validated as given.
    ///
    /// # Cache
    ///
    /// After the durable write, the mapping is written to the cache before
    /// returning. A failed cache write is logged and does not undo the link;
    /// it stays resolvable through the store.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidDestination`] / [`AppError::InvalidCode`] before any I/O
    /// - [`AppError::CodeTaken`] if the custom code is in use, or another
    ///   creator won the race for it
    /// - [`AppError::CodeGenerationExhausted`] if no free code was found
    /// - store failures as returned by the repository
    pub async fn create(
        &self,
        owner_id: &str,
        destination: &str,
        custom_code: Option<&str>,
    ) -> Result<ShortLink, AppError> {
        validate_destination(destination)
            .map_err(|e| AppError::InvalidDestination(e.to_string()))?;

        let code = match custom_code.filter(|c| !c.is_empty()) {
            Some(raw) => self.generator.claim_custom(raw, owner_id).await?,
            None => self.generator.generate(owner_id).await?,
        };

        let new_link = NewShortLink {
            code: code.clone(),
            owner_id: owner_id.to_string(),
            destination: destination.to_string(),
        };

        let created = self.store(self.repository.create(new_link)).await;
        self.generator.release(&code).await;
        let link = created?;

        self.cache_mapping(&link.code, &link.destination).await;

        info!(code = %link.code, owner_id, "Short link created");
        Ok(link)
    }

    /// Resolves a code to its destination.
    ///
    /// Accepts codes with a path prefix or in any case. Every successful
    /// resolve queues one click without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code does not exist.
    /// Returns store failures when the cache misses and the store fails.
    pub async fn resolve(&self, raw_code: &str) -> Result<String, AppError> {
        let code = normalize_code(raw_code);
        if code.is_empty() || !is_code_charset(&code) {
            return Err(AppError::NotFound);
        }

        match self.cached(self.cache.get(&CacheKey::url(&code))).await {
            Ok(Some(destination)) => {
                metrics::counter!("cache_hits_total").increment(1);
                debug!(code = %code, "Cache HIT");
                self.clicks.dispatch(&code);
                return Ok(destination);
            }
            Ok(None) => {
                metrics::counter!("cache_misses_total").increment(1);
                debug!(code = %code, "Cache MISS");
            }
            Err(e) => {
                metrics::counter!("cache_errors_total").increment(1);
                warn!(code = %code, error = %e, "Cache read failed, falling back to store");
            }
        }

        let link = self
            .store(self.repository.find_by_code(&code))
            .await?
            .ok_or(AppError::NotFound)?;

        self.cache_mapping(&code, &link.destination).await;
        self.clicks.dispatch(&code);

        Ok(link.destination)
    }

    /// Points an owned link at a new destination.
    ///
    /// Follows the same write pattern as [`Self::create`]: durable update,
    /// then a best-effort cache write.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidDestination`] before any I/O
    /// - [`AppError::NotFound`] / [`AppError::Unauthorized`] from the ownership check
    pub async fn update(
        &self,
        owner_id: &str,
        raw_code: &str,
        destination: &str,
    ) -> Result<ShortLink, AppError> {
        validate_destination(destination)
            .map_err(|e| AppError::InvalidDestination(e.to_string()))?;

        let link = self.owned_link(owner_id, raw_code).await?;
        let updated = self
            .store(self.repository.update_destination(&link.code, destination))
            .await?;

        self.cache_mapping(&updated.code, &updated.destination).await;

        info!(code = %updated.code, owner_id, "Short link updated");
        Ok(updated)
    }

    /// Deletes an owned link and its cache entries.
    ///
    /// The durable delete happens first and cannot be undone. If removing the
    /// mapping or counter from the cache then fails, the error is returned:
    /// the link is gone but may still resolve from the cache until its
    /// entry expires.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] / [`AppError::Unauthorized`] from the ownership check
    /// - [`AppError::CacheUnavailable`] / [`AppError::Timeout`] if cache cleanup failed
    pub async fn delete(&self, owner_id: &str, raw_code: &str) -> Result<(), AppError> {
        let link = self.owned_link(owner_id, raw_code).await?;

        let deleted = self
            .store(self.repository.delete(&link.code, owner_id))
            .await?;
        if !deleted {
            return Err(AppError::NotFound);
        }

        let keys = [CacheKey::url(&link.code), CacheKey::clicks(&link.code)];
        if let Err(e) = self.cached(self.cache.delete_many(&keys)).await {
            warn!(code = %link.code, error = %e, "Link deleted but cache cleanup failed");
            return Err(e.into());
        }

        info!(code = %link.code, owner_id, "Short link deleted");
        Ok(())
    }

    /// Returns an owned link.
    pub async fn get_link(&self, owner_id: &str, raw_code: &str) -> Result<ShortLink, AppError> {
        self.owned_link(owner_id, raw_code).await
    }

    /// Lists an owner's links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidPagination`] unless `page >= 1`,
    /// `1 <= page_size <= 100` and the page offset fits in an `i64`.
    pub async fn list_links(
        &self,
        owner_id: &str,
        page: i64,
        page_size: i64,
    ) -> Result<Page<ShortLink>, AppError> {
        if page < 1 {
            return Err(AppError::InvalidPagination(
                "page must be greater than 0".to_string(),
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::InvalidPagination(format!(
                "page size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        if (page - 1).checked_mul(page_size).is_none() {
            return Err(AppError::InvalidPagination(format!(
                "page {} is out of range",
                page
            )));
        }

        let (items, total) = self
            .store(
                self.repository
                    .find_by_owner_paginated(owner_id, page, page_size),
            )
            .await?;

        Ok(Page {
            items,
            total,
            page,
            page_size,
        })
    }

    /// Click statistics for an owned link.
    ///
    /// Reports the cache counter when one exists and the durable counter
    /// otherwise.
    pub async fn stats(&self, owner_id: &str, raw_code: &str) -> Result<LinkStats, AppError> {
        let link = self.owned_link(owner_id, raw_code).await?;

        let cached = match self.cached(self.cache.get(&CacheKey::clicks(&link.code))).await {
            Ok(value) => value.and_then(|v| v.parse::<i64>().ok()),
            Err(e) => {
                debug!(code = %link.code, error = %e, "Cache counter unavailable, using store");
                None
            }
        };

        let (total_clicks, source) = match cached {
            Some(count) => (count, ClickSource::Cache),
            None => (link.clicks, ClickSource::Store),
        };

        Ok(LinkStats {
            code: link.code,
            total_clicks,
            source,
            last_accessed_at: link.updated_at,
        })
    }

    /// Checks if the durable store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.store(async { Ok(self.repository.health_check().await) })
            .await
            .unwrap_or(false)
    }

    /// Checks if the cache is reachable.
    pub async fn cache_healthy(&self) -> bool {
        self.cached(async { Ok(self.cache.health_check().await) })
            .await
            .unwrap_or(false)
    }

    /// Loads a link and checks it belongs to `owner_id`.
    async fn owned_link(&self, owner_id: &str, raw_code: &str) -> Result<ShortLink, AppError> {
        let code = normalize_code(raw_code);
        if code.is_empty() || !is_code_charset(&code) {
            return Err(AppError::NotFound);
        }

        let link = self
            .store(self.repository.find_by_code(&code))
            .await?
            .ok_or(AppError::NotFound)?;

        if !link.is_owned_by(owner_id) {
            warn!(code = %code, owner_id, "Ownership check failed");
            return Err(AppError::Unauthorized);
        }

        Ok(link)
    }

    /// Best-effort write of the code → destination mapping.
    async fn cache_mapping(&self, code: &str, destination: &str) {
        let key = CacheKey::url(code);
        if let Err(e) = self
            .cached(self.cache.set(&key, destination, self.settings.url_ttl))
            .await
        {
            warn!(code, error = %e, "Failed to cache short link mapping");
        }
    }

    async fn store<T>(
        &self,
        fut: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        store_call(self.settings.deadlines.store, fut).await
    }

    async fn cached<T>(
        &self,
        fut: impl Future<Output = crate::infrastructure::cache::CacheResult<T>>,
    ) -> crate::infrastructure::cache::CacheResult<T> {
        cache_call(self.settings.deadlines.cache, fut).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::click_event::ClickEvent;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::{CacheError, MemoryCache, MockCacheService};
    use chrono::Utc;
    use tokio::sync::mpsc;

    const DEST: &str = "https://example.com/landing";

    fn link(code: &str, owner: &str, destination: &str, clicks: i64) -> ShortLink {
        let now = Utc::now();
        ShortLink::new(
            1,
            code.to_string(),
            owner.to_string(),
            destination.to_string(),
            clicks,
            now,
            now,
        )
    }

    fn service(
        repo: MockLinkRepository,
        cache: Arc<dyn CacheService>,
    ) -> (LinkService<MockLinkRepository>, mpsc::Receiver<ClickEvent>) {
        let (clicks, rx) = ClickDispatcher::channel(16);
        let service = LinkService::new(Arc::new(repo), cache, clicks, LinkSettings::default());
        (service, rx)
    }

    async fn cached_url(cache: &MemoryCache, code: &str) -> Option<String> {
        cache.get(&CacheKey::url(code)).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_with_custom_code_caches_mapping() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists_by_code()
            .withf(|code| code == "mylink1")
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_create()
            .withf(|new| new.code == "mylink1" && new.owner_id == "owner-1")
            .times(1)
            .returning(|new| Ok(link(&new.code, &new.owner_id, &new.destination, 0)));

        let cache = Arc::new(MemoryCache::new());
        let (service, _rx) = service(repo, cache.clone());

        let created = service
            .create("owner-1", DEST, Some("MyLink1"))
            .await
            .unwrap();

        assert_eq!(created.code, "mylink1");
        assert_eq!(cached_url(&cache, "mylink1").await.as_deref(), Some(DEST));
        assert!(
            !cache
                .exists(&CacheKey::reservation("mylink1"))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_create_invalid_destination_does_no_io() {
        let (service, _rx) = service(MockLinkRepository::new(), Arc::new(MockCacheService::new()));

        let err = service
            .create("owner-1", "ftp://example.com/file", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidDestination(_)));

        let err = service.create("owner-1", "not a url", None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidDestination(_)));
    }

    #[tokio::test]
    async fn test_create_empty_custom_code_generates() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists_by_code().times(1).returning(|_| Ok(false));
        repo.expect_create()
            .times(1)
            .returning(|new| Ok(link(&new.code, &new.owner_id, &new.destination, 0)));

        let (service, _rx) = service(repo, Arc::new(MemoryCache::new()));

        let created = service.create("owner-1", DEST, Some("")).await.unwrap();
        assert_eq!(created.code.len(), DEFAULT_CODE_LENGTH);
        assert!(is_code_charset(&created.code));
    }

    #[tokio::test]
    async fn test_create_custom_code_with_spaces_is_invalid() {
        let (service, _rx) = service(MockLinkRepository::new(), Arc::new(MockCacheService::new()));

        for code in ["   ", " abc", "MyLink1 ", "my link"] {
            let err = service.create("owner-1", DEST, Some(code)).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidCode(_)), "{code:?}");
        }
    }

    #[tokio::test]
    async fn test_create_survives_cache_write_failure() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists_by_code().returning(|_| Ok(false));
        repo.expect_create()
            .times(1)
            .returning(|new| Ok(link(&new.code, &new.owner_id, &new.destination, 0)));

        let mut cache = MockCacheService::new();
        cache.expect_exists().returning(|_| Ok(false));
        cache.expect_set_if_absent().returning(|_, _, _| Ok(true));
        cache.expect_delete().returning(|_| Ok(()));
        cache
            .expect_set()
            .times(1)
            .returning(|_, _, _| Err(CacheError::Unavailable("down".into())));

        let (service, _rx) = service(repo, Arc::new(cache));

        let created = service.create("owner-1", DEST, Some("custom")).await.unwrap();
        assert_eq!(created.code, "custom");
    }

    #[tokio::test]
    async fn test_create_store_conflict_releases_reservation() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists_by_code().returning(|_| Ok(false));
        repo.expect_create()
            .times(1)
            .returning(|new| Err(AppError::CodeTaken(new.code)));

        let cache = Arc::new(MemoryCache::new());
        let (service, _rx) = service(repo, cache.clone());

        let err = service
            .create("owner-1", DEST, Some("custom"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CodeTaken(code) if code == "custom"));
        assert!(!cache.exists(&CacheKey::reservation("custom")).await.unwrap());
        assert_eq!(cached_url(&cache, "custom").await, None);
    }

    #[tokio::test]
    async fn test_resolve_cache_hit_skips_store_and_queues_click() {
        let cache = Arc::new(MemoryCache::new());
        cache
            .set(&CacheKey::url("abc123"), DEST, Duration::from_secs(60))
            .await
            .unwrap();

        let (service, mut rx) = service(MockLinkRepository::new(), cache);

        assert_eq!(service.resolve("ABC123").await.unwrap(), DEST);
        assert_eq!(rx.try_recv().unwrap().code, "abc123");
    }

    #[tokio::test]
    async fn test_resolve_cache_miss_loads_and_populates() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|code| Ok(Some(link(code, "owner-1", DEST, 0))));

        let cache = Arc::new(MemoryCache::new());
        let (service, mut rx) = service(repo, cache.clone());

        assert_eq!(service.resolve("urls/abc123").await.unwrap(), DEST);
        assert_eq!(cached_url(&cache, "abc123").await.as_deref(), Some(DEST));
        assert_eq!(rx.try_recv().unwrap().code, "abc123");

        // Second resolve is served from the cache; the mock allows one store call.
        assert_eq!(service.resolve("abc123").await.unwrap(), DEST);
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_store_when_cache_fails() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|code| Ok(Some(link(code, "owner-1", DEST, 0))));

        let mut cache = MockCacheService::new();
        cache
            .expect_get()
            .returning(|_| Err(CacheError::Unavailable("down".into())));
        cache
            .expect_set()
            .returning(|_, _, _| Err(CacheError::Unavailable("down".into())));

        let (service, mut rx) = service(repo, Arc::new(cache));

        assert_eq!(service.resolve("abc123").await.unwrap(), DEST);
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_resolve_unknown_code_is_not_found_without_click() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));

        let (service, mut rx) = service(repo, Arc::new(MemoryCache::new()));

        assert!(matches!(
            service.resolve("missing").await,
            Err(AppError::NotFound)
        ));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolve_malformed_code_does_no_io() {
        let (service, _rx) = service(MockLinkRepository::new(), Arc::new(MockCacheService::new()));

        assert!(matches!(service.resolve("").await, Err(AppError::NotFound)));
        assert!(matches!(
            service.resolve("bad code!").await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_rejects_other_owner() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .returning(|code| Ok(Some(link(code, "owner-1", DEST, 0))));

        let (service, _rx) = service(repo, Arc::new(MemoryCache::new()));

        let err = service
            .update("owner-2", "abc123", "https://example.org")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_update_refreshes_cached_mapping() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .returning(|code| Ok(Some(link(code, "owner-1", DEST, 0))));
        repo.expect_update_destination()
            .withf(|code, dest| code == "abc123" && dest == "https://example.org/new")
            .times(1)
            .returning(|code, dest| Ok(link(code, "owner-1", dest, 0)));

        let cache = Arc::new(MemoryCache::new());
        cache
            .set(&CacheKey::url("abc123"), DEST, Duration::from_secs(60))
            .await
            .unwrap();

        let (service, _rx) = service(repo, cache.clone());

        let updated = service
            .update("owner-1", "abc123", "https://example.org/new")
            .await
            .unwrap();

        assert_eq!(updated.destination, "https://example.org/new");
        assert_eq!(
            cached_url(&cache, "abc123").await.as_deref(),
            Some("https://example.org/new")
        );
    }

    #[tokio::test]
    async fn test_delete_removes_mapping_and_counter() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .returning(|code| Ok(Some(link(code, "owner-1", DEST, 0))));
        repo.expect_delete()
            .withf(|code, owner| code == "abc123" && owner == "owner-1")
            .times(1)
            .returning(|_, _| Ok(true));

        let cache = Arc::new(MemoryCache::new());
        cache
            .set(&CacheKey::url("abc123"), DEST, Duration::from_secs(60))
            .await
            .unwrap();
        cache.increment(&CacheKey::clicks("abc123")).await.unwrap();

        let (service, _rx) = service(repo, cache.clone());

        service.delete("owner-1", "abc123").await.unwrap();

        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_delete_reports_cache_cleanup_failure() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .returning(|code| Ok(Some(link(code, "owner-1", DEST, 0))));
        repo.expect_delete().times(1).returning(|_, _| Ok(true));

        let mut cache = MockCacheService::new();
        cache
            .expect_delete_many()
            .times(1)
            .returning(|_| Err(CacheError::Unavailable("down".into())));

        let (service, _rx) = service(repo, Arc::new(cache));

        let err = service.delete("owner-1", "abc123").await.unwrap_err();
        assert!(matches!(err, AppError::CacheUnavailable(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_link() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().returning(|_| Ok(None));

        let (service, _rx) = service(repo, Arc::new(MemoryCache::new()));

        assert!(matches!(
            service.delete("owner-1", "abc123").await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_links_validates_pagination() {
        let (service, _rx) = service(MockLinkRepository::new(), Arc::new(MemoryCache::new()));

        for (page, page_size) in [(0, 10), (1, 0), (1, 101), (-1, 10), (i64::MAX, 100)] {
            assert!(matches!(
                service.list_links("owner-1", page, page_size).await,
                Err(AppError::InvalidPagination(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_list_links_returns_page() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_owner_paginated()
            .withf(|owner, page, size| owner == "owner-1" && *page == 2 && *size == 1)
            .times(1)
            .returning(|owner, _, _| Ok((vec![link("abc123", owner, DEST, 0)], 3)));

        let (service, _rx) = service(repo, Arc::new(MemoryCache::new()));

        let page = service.list_links("owner-1", 2, 1).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages(), 3);
    }

    #[tokio::test]
    async fn test_stats_prefers_cache_counter() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .returning(|code| Ok(Some(link(code, "owner-1", DEST, 2))));

        let cache = Arc::new(MemoryCache::new());
        for _ in 0..5 {
            cache.increment(&CacheKey::clicks("abc123")).await.unwrap();
        }

        let (service, _rx) = service(repo, cache);

        let stats = service.stats("owner-1", "abc123").await.unwrap();
        assert_eq!(stats.total_clicks, 5);
        assert_eq!(stats.source, ClickSource::Cache);
    }

    #[tokio::test]
    async fn test_stats_falls_back_to_store_counter() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .returning(|code| Ok(Some(link(code, "owner-1", DEST, 7))));

        let mut cache = MockCacheService::new();
        cache.expect_get().returning(|_| Err(CacheError::Timeout));

        let (service, _rx) = service(repo, Arc::new(cache));

        let stats = service.stats("owner-1", "abc123").await.unwrap();
        assert_eq!(stats.total_clicks, 7);
        assert_eq!(stats.source, ClickSource::Store);
    }
}
