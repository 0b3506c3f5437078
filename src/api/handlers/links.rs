//! Handlers for link management endpoints (create, list, get, update, delete).

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkListResponse, LinkResponse, UpdateLinkRequest};
use crate::api::dto::pagination::PaginationParams;
use crate::api::middleware::owner::OwnerId;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for the caller.
///
/// # Endpoint
///
/// `POST /api/urls`
///
/// # Request Body
///
/// ```json
/// {
///   "long_url": "https://example.com",
///   "short_code": "my-link"   // optional
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request for an invalid URL or code
/// - 409 Conflict if the custom code is already taken
/// - 503 Service Unavailable if no free code could be generated
pub async fn create_link_handler(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create(&owner, &payload.long_url, payload.short_code.as_deref())
        .await?;

    let short_url = state.short_url(&link.code);
    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_link(link, short_url)),
    ))
}

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/urls?page=1&page_size=20`
///
/// # Errors
///
/// Returns 400 Bad Request unless `page >= 1` and `1 <= page_size <= 100`.
pub async fn list_links_handler(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
    Query(params): Query<PaginationParams>,
) -> Result<Json<LinkListResponse>, AppError> {
    let (page, page_size) = params.resolve();

    let page = state
        .link_service
        .list_links(&owner, page, page_size)
        .await?;

    Ok(Json(LinkListResponse::from_page(page, |code| {
        state.short_url(code)
    })))
}

/// Returns one of the caller's links.
///
/// # Endpoint
///
/// `GET /api/urls/{code}`
pub async fn get_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(&owner, &code).await?;
    let short_url = state.short_url(&link.code);
    Ok(Json(LinkResponse::from_link(link, short_url)))
}

/// Points one of the caller's links at a new destination.
///
/// # Endpoint
///
/// `PUT /api/urls/{code}`
///
/// # Cache
///
/// The cached mapping is overwritten so the next redirect uses the new
/// destination.
pub async fn update_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .update(&owner, &code, &payload.long_url)
        .await?;

    let short_url = state.short_url(&link.code);
    Ok(Json(LinkResponse::from_link(link, short_url)))
}

/// Permanently deletes one of the caller's links.
///
/// # Endpoint
///
/// `DELETE /api/urls/{code}`
///
/// # Errors
///
/// - 404 Not Found if the link doesn't exist
/// - 403 Forbidden if the link belongs to another owner
/// - 503 Service Unavailable if the link was deleted but its cache entries
///   could not be removed
pub async fn delete_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
) -> Result<StatusCode, AppError> {
    state.link_service.delete(&owner, &code).await?;
    Ok(StatusCode::NO_CONTENT)
}
