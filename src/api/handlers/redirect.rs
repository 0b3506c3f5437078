//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its destination.
///
/// # Endpoint
///
/// `GET /{code}` and `GET /urls/{code}`
///
/// # Request Flow
///
/// 1. Normalize the code (case-insensitive)
/// 2. Check the cache for the mapping
/// 3. On miss or cache error, query the store and repopulate the cache
/// 4. Queue a click for background accounting
/// 5. Return 307 Temporary Redirect
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let destination = state.link_service.resolve(&code).await?;
    Ok(Redirect::temporary(&destination))
}
