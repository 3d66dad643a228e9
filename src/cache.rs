//! Optional response cache collaborator.
//!
//! Keyed by a serialized request fingerprint. Misses and store failures
//! are transparent no-ops by contract; callers never branch on cache
//! health.

use std::time::{Duration, Instant};

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::hybrid::RecommendationRequest;

/// Time-to-live response cache.
pub trait ResponseCache: Send + Sync {
    /// Fetch a cached response body, if present and not expired.
    fn get(&self, key: &str) -> Option<String>;
    /// Store a response body with a time-to-live. Failures are no-ops.
    fn put(&self, key: &str, value: String, ttl: Duration);
}

/// Stable cache key for a request.
///
/// Serialization of a plain data struct cannot fail, so a (theoretical)
/// error degrades to an uncacheable empty key rather than propagating.
pub fn request_fingerprint(request: &RecommendationRequest) -> String {
    serde_json::to_string(request).unwrap_or_default()
}

/// In-memory TTL cache.
pub struct MemoryCache {
    entries: Mutex<AHashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(AHashMap::new()),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((value, deadline)) if Instant::now() < *deadline => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn put(&self, key: &str, value: String, ttl: Duration) {
        let deadline = Instant::now() + ttl;
        self.entries
            .lock()
            .insert(key.to_string(), (value, deadline));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get() {
        let cache = MemoryCache::new();
        cache.put("k", "v".to_string(), Duration::from_secs(60));
        assert_eq!(cache.get("k"), Some("v".to_string()));
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = MemoryCache::new();
        cache.put("k", "v".to_string(), Duration::ZERO);
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_miss_on_unknown_key() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn test_fingerprint_is_stable_and_distinguishes_requests() {
        let a = RecommendationRequest {
            genres: vec!["Fantasy".to_string()],
            ..RecommendationRequest::default()
        };
        let b = RecommendationRequest {
            genres: vec!["Literary".to_string()],
            ..RecommendationRequest::default()
        };
        assert_eq!(request_fingerprint(&a), request_fingerprint(&a));
        assert_ne!(request_fingerprint(&a), request_fingerprint(&b));
    }
}
