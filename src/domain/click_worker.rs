//! Bounded background click accounting.
//!
//! Resolves hand clicks to a [`ClickDispatcher`], which queues them without
//! waiting. [`run_click_worker`] drains the queue with a fixed number of
//! concurrent tasks. Each task bumps the cache counter and then, under its
//! own deadline, the durable counter. Nothing is retried and every failure
//! is logged and dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::{CacheKey, CacheService};
use crate::utils::deadline::{cache_call, store_call};

/// Sending half of the click queue.
///
/// Cheap to clone; every clone feeds the same worker.
#[derive(Debug, Clone)]
pub struct ClickDispatcher {
    tx: mpsc::Sender<ClickEvent>,
}

impl ClickDispatcher {
    /// Creates a dispatcher and the receiver to pass to [`run_click_worker`].
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ClickEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Queues a click for `code` and returns immediately.
    ///
    /// When the queue is full the click is dropped.
    pub fn dispatch(&self, code: &str) {
        match self.tx.try_send(ClickEvent::new(code)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                metrics::counter!("clicks_dropped_total").increment(1);
                debug!(code = %event.code, "Click queue full, dropping click");
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                warn!(code = %event.code, "Click queue closed, dropping click");
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Free slots left in the queue.
    pub fn capacity(&self) -> usize {
        self.tx.capacity()
    }
}

/// Tuning for [`run_click_worker`].
#[derive(Debug, Clone, Copy)]
pub struct ClickWorkerSettings {
    /// Maximum number of clicks processed at the same time.
    pub concurrency: usize,
    /// Expiry re-applied to the cache counter on every click.
    pub counter_ttl: Duration,
    pub cache_timeout: Duration,
    /// Deadline for the durable increment.
    pub persist_timeout: Duration,
}

impl Default for ClickWorkerSettings {
    fn default() -> Self {
        Self {
            concurrency: 4,
            counter_ttl: Duration::from_secs(30 * 24 * 60 * 60),
            cache_timeout: Duration::from_millis(250),
            persist_timeout: Duration::from_secs(5),
        }
    }
}

/// Drains the click queue until every [`ClickDispatcher`] is dropped.
///
/// At most `settings.concurrency` clicks are in flight; the loop waits for a
/// free slot before taking the next event, so a burst backs up into the
/// bounded queue instead of spawning unbounded work. In-flight clicks are
/// awaited before the function returns.
pub async fn run_click_worker<R>(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
    settings: ClickWorkerSettings,
) where
    R: LinkRepository + ?Sized + 'static,
{
    let concurrency = settings.concurrency.max(1);
    let slots = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = slots.clone().acquire_owned().await else {
            break;
        };

        let queued_ms = (chrono::Utc::now() - event.occurred_at).num_milliseconds();
        if queued_ms > 1_000 {
            warn!(code = %event.code, queued_ms, "Click waited long in queue");
        }

        let repository = repository.clone();
        let cache = cache.clone();
        tokio::spawn(async move {
            record_click(&event.code, repository.as_ref(), cache.as_ref(), &settings).await;
            drop(permit);
        });
    }

    let _ = slots.acquire_many(concurrency as u32).await;
    info!("Click worker stopped");
}

/// Counts one click: cache counter first, then the durable counter.
///
/// The two steps are independent; a cache failure does not skip the durable
/// increment.
pub async fn record_click<R>(
    code: &str,
    repository: &R,
    cache: &dyn CacheService,
    settings: &ClickWorkerSettings,
) where
    R: LinkRepository + ?Sized,
{
    let key = CacheKey::clicks(code);
    match cache_call(
        settings.cache_timeout,
        cache.increment_with_expiry(&key, settings.counter_ttl),
    )
    .await
    {
        Ok(total) => debug!(code, total, "Cache click counter incremented"),
        Err(e) => debug!(code, error = %e, "Cache click increment failed"),
    }

    if let Err(e) = store_call(settings.persist_timeout, repository.increment_clicks(code)).await {
        debug!(code, error = %e, "Durable click increment failed");
    }
}
