//! Pagination query parameters and response metadata.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::entities::Page;

pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
/// Range checks happen in the service so every caller gets the same rules.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<i64>,
}

impl PaginationParams {
    /// Returns `(page, page_size)` with defaults applied.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: 20
    pub fn resolve(&self) -> (i64, i64) {
        (
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

/// Pagination block included in list responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn from_page<T>(page: &Page<T>) -> Self {
        Self {
            page: page.page,
            page_size: page.page_size,
            total_items: page.total,
            total_pages: page.total_pages(),
        }
    }
}
