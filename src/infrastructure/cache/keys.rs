//! Namespaced cache keys.

use std::fmt;

/// A logical key domain inside a shared cache instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Namespace(&'static str);

impl Namespace {
    /// Code → destination mappings.
    pub const URL: Namespace = Namespace("url");
    /// Near-real-time click counters.
    pub const CLICKS: Namespace = Namespace("clicks");
    /// Short-lived create reservations guarding concurrent claims of one code.
    pub const RESERVATION: Namespace = Namespace("reserve");

    pub const fn new(prefix: &'static str) -> Self {
        Self(prefix)
    }

    pub fn prefix(&self) -> &'static str {
        self.0
    }

    pub fn key(self, key: impl Into<String>) -> CacheKey {
        CacheKey {
            namespace: self,
            key: key.into(),
        }
    }
}

/// A cache key rendered as `"{namespace}:{key}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: Namespace,
    key: String,
}

impl CacheKey {
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// The key without its namespace prefix.
    pub fn raw(&self) -> &str {
        &self.key
    }

    pub fn url(code: &str) -> Self {
        Namespace::URL.key(code)
    }

    pub fn clicks(code: &str) -> Self {
        Namespace::CLICKS.key(code)
    }

    pub fn reservation(code: &str) -> Self {
        Namespace::RESERVATION.key(code)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace.0, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendering() {
        assert_eq!(CacheKey::url("abc123").to_string(), "url:abc123");
        assert_eq!(CacheKey::clicks("abc123").to_string(), "clicks:abc123");
        assert_eq!(CacheKey::reservation("abc123").to_string(), "reserve:abc123");
    }

    #[test]
    fn test_namespaces_do_not_collide() {
        let mapping = CacheKey::url("abc123");
        let counter = CacheKey::clicks("abc123");
        assert_ne!(mapping, counter);
        assert_ne!(mapping.to_string(), counter.to_string());
        assert_eq!(mapping.raw(), counter.raw());
    }

    #[test]
    fn test_custom_namespace() {
        let qr = Namespace::new("qr").key("abc123");
        assert_eq!(qr.to_string(), "qr:abc123");
        assert_eq!(qr.namespace().prefix(), "qr");
    }
}
