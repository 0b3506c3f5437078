//! Short link entity representing a code → destination mapping.

use chrono::{DateTime, Utc};

/// A short code mapped to a destination, owned by one identity.
///
/// `code` is always in its normalized (lowercase) form. `clicks` is the
/// durable counter, which may lag behind the cached counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub id: i64,
    pub code: String,
    pub owner_id: String,
    pub destination: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShortLink {
    /// Creates a new ShortLink instance.
    pub fn new(
        id: i64,
        code: String,
        owner_id: String,
        destination: String,
        clicks: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            code,
            owner_id,
            destination,
            clicks,
            created_at,
            updated_at,
        }
    }

    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }
}

/// Input data for creating a new short link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShortLink {
    pub code: String,
    pub owner_id: String,
    pub destination: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_link_creation() {
        let now = Utc::now();
        let link = ShortLink::new(
            1,
            "abc123".to_string(),
            "owner-1".to_string(),
            "https://example.com".to_string(),
            0,
            now,
            now,
        );

        assert_eq!(link.id, 1);
        assert_eq!(link.code, "abc123");
        assert_eq!(link.destination, "https://example.com");
        assert_eq!(link.clicks, 0);
        assert_eq!(link.created_at, now);
    }

    #[test]
    fn test_ownership() {
        let now = Utc::now();
        let link = ShortLink::new(
            1,
            "abc123".to_string(),
            "owner-1".to_string(),
            "https://example.com".to_string(),
            0,
            now,
            now,
        );

        assert!(link.is_owned_by("owner-1"));
        assert!(!link.is_owned_by("owner-2"));
        assert!(!link.is_owned_by("OWNER-1"));
    }
}
