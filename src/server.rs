//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, worker spawning, and Axum server lifecycle.

use crate::application::services::LinkService;
use crate::config::Config;
use crate::domain::click_worker::{ClickDispatcher, run_click_worker};
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::{CacheService, MemoryCache, RedisCache};
use crate::infrastructure::persistence::PgLinkRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Key prefix for every Redis key written by this service.
pub const REDIS_KEY_PREFIX: &str = "shortlink";

/// How long shutdown waits for queued clicks to be recorded.
const CLICK_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache (or in-process fallback)
/// - Background click worker
/// - Axum HTTP server
///
/// On Ctrl-C / SIGTERM the server stops accepting requests, then waits for
/// the click queue to drain.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let cache = connect_cache(config.redis_url.as_deref()).await;
    let repository: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(Arc::new(pool)));

    let (click_dispatcher, click_rx) = ClickDispatcher::channel(config.click_queue_capacity);
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        repository.clone(),
        cache.clone(),
        config.click_worker_settings(),
    ));
    tracing::info!(
        concurrency = config.click_worker_concurrency,
        "Click worker started"
    );

    let link_service = Arc::new(LinkService::new(
        repository,
        cache,
        click_dispatcher,
        config.link_settings(),
    ));
    let state = AppState::new(link_service, &config.base_url);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and with it the last dispatcher) is gone, so the worker
    // finishes once the queue is empty.
    match tokio::time::timeout(CLICK_DRAIN_TIMEOUT, worker).await {
        Ok(_) => tracing::info!("Click queue drained"),
        Err(_) => tracing::warn!("Timed out draining click queue"),
    }

    Ok(())
}

/// Connects to Redis, falling back to [`MemoryCache`] when it is not
/// configured or unreachable.
pub async fn connect_cache(redis_url: Option<&str>) -> Arc<dyn CacheService> {
    let Some(redis_url) = redis_url else {
        tracing::info!("Cache: in-process (Redis not configured)");
        return Arc::new(MemoryCache::new());
    };

    match RedisCache::connect(redis_url, REDIS_KEY_PREFIX).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to connect to Redis, using in-process cache");
            Arc::new(MemoryCache::new())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
