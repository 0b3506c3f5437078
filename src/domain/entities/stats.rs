//! Click statistics for a single short link.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Where a reported click total came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickSource {
    /// Near-real-time cache counter.
    Cache,
    /// Durable counter, used when no cache counter is present.
    Store,
}

/// Click statistics for one link.
///
/// The cache and durable counters are never reconciled; they may drift apart
/// and `total_clicks` reports whichever one [`ClickSource`] names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStats {
    pub code: String,
    pub total_clicks: i64,
    pub source: ClickSource,
    pub last_accessed_at: DateTime<Utc>,
}
