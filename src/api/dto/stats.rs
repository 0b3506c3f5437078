//! DTOs for link statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::ClickSource;

/// Click statistics for a specific short link.
///
/// `source` tells whether `total_clicks` came from the near-real-time cache
/// counter or the durable one.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub code: String,
    pub short_url: String,
    pub total_clicks: i64,
    pub source: ClickSource,
    pub last_accessed_at: DateTime<Utc>,
}
