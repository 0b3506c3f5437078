//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Store and click queue healthy
/// - **503 Service Unavailable**: Store unreachable or click queue closed
///
/// A failing cache is reported but does not degrade the service, since
/// every read falls back to the store.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok", "message": "Connected" },
///     "cache": { "status": "ok", "message": "Connected" },
///     "click_queue": { "status": "ok", "message": "Free slots: 10000" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let (store_ok, cache_ok) = tokio::join!(
        state.link_service.store_healthy(),
        state.link_service.cache_healthy()
    );

    let store = if store_ok {
        CheckStatus::ok("Connected")
    } else {
        CheckStatus::error("Store unreachable")
    };

    let cache = if cache_ok {
        CheckStatus::ok("Connected")
    } else {
        CheckStatus::error("Cache unreachable, serving from store")
    };

    let click_queue = if state.click_dispatcher.is_closed() {
        CheckStatus::error("Click queue is closed")
    } else {
        CheckStatus::ok(format!(
            "Free slots: {}",
            state.click_dispatcher.capacity()
        ))
    };

    let healthy = store.is_ok() && click_queue.is_ok();
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks {
            store,
            cache,
            click_queue,
        },
    };

    (status, Json(response))
}
