//! Handler for per-link click statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::api::middleware::owner::OwnerId;
use crate::error::AppError;
use crate::state::AppState;

/// Returns click statistics for one of the caller's links.
///
/// # Endpoint
///
/// `GET /api/urls/{code}/stats`
///
/// # Errors
///
/// - 404 Not Found if the link doesn't exist
/// - 403 Forbidden if the link belongs to another owner
pub async fn stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.link_service.stats(&owner, &code).await?;

    Ok(Json(StatsResponse {
        short_url: state.short_url(&stats.code),
        code: stats.code,
        total_clicks: stats.total_clicks,
        source: stats.source,
        last_accessed_at: stats.last_accessed_at,
    }))
}
