//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::pagination::PaginationMeta;
use crate::domain::entities::{Page, ShortLink};

/// Request body for `POST /api/urls`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Destination URL (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    #[validate(length(max = 2048, message = "URL is too long"))]
    pub long_url: String,

    /// Optional custom short code. Empty means "generate one".
    ///
    /// Checked by the service so malformed codes surface as `invalid_code`.
    #[serde(default)]
    pub short_code: Option<String>,
}

/// Request body for `PUT /api/urls/{code}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(url(message = "Invalid URL format"))]
    #[validate(length(max = 2048, message = "URL is too long"))]
    pub long_url: String,
}

/// JSON representation of a link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub code: String,
    pub short_url: String,
    pub long_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn from_link(link: ShortLink, short_url: String) -> Self {
        Self {
            code: link.code,
            short_url,
            long_url: link.destination,
            clicks: link.clicks,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// One page of an owner's links.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub pagination: PaginationMeta,
    pub items: Vec<LinkResponse>,
}

impl LinkListResponse {
    pub fn from_page(page: Page<ShortLink>, short_url: impl Fn(&str) -> String) -> Self {
        let pagination = PaginationMeta::from_page(&page);
        let items = page
            .items
            .into_iter()
            .map(|link| {
                let url = short_url(&link.code);
                LinkResponse::from_link(link, url)
            })
            .collect();

        Self { pagination, items }
    }
}
