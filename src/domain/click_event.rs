//! Click event model for asynchronous click accounting.

use chrono::{DateTime, Utc};

/// A click waiting to be counted.
///
/// Carries only the normalized code; the worker does not need anything from
/// the request that triggered it, and holds no reference back to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub code: String,
    pub occurred_at: DateTime<Utc>,
}

impl ClickEvent {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            occurred_at: Utc::now(),
        }
    }
}
