//! LRU + TTL cache for assembled ask responses.
//!
//! Sits in front of the whole pipeline for fresh requests so repeated
//! questions skip extraction, search, and generation entirely.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::pipeline::AskResponse;

struct CacheEntry {
    response: AskResponse,
    inserted_at: Instant,
}

/// Thread-safe LRU response cache.
pub struct ResponseCache {
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    order: Vec<String>,
    max_size: usize,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a new cache with the given capacity and TTL.
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::with_capacity(max_size),
                order: Vec::with_capacity(max_size),
                max_size,
                ttl,
            }),
        }
    }

    /// Default settings: 500 entries, 5-minute TTL.
    pub fn default_cache() -> Self {
        Self::new(500, Duration::from_secs(300))
    }

    /// Get a cached response. Returns None on miss or expired entry.
    pub fn get(&self, key: &str) -> Option<AskResponse> {
        let mut inner = self.inner.lock();

        let expired = inner
            .entries
            .get(key)
            .map(|e| e.inserted_at.elapsed() >= inner.ttl);

        match expired {
            Some(false) => {
                let response = inner.entries.get(key).map(|e| e.response.clone());
                if let Some(pos) = inner.order.iter().position(|k| k == key) {
                    let key = inner.order.remove(pos);
                    inner.order.push(key);
                }
                response
            }
            Some(true) => {
                let key = key.to_string();
                inner.entries.remove(&key);
                inner.order.retain(|k| k != &key);
                None
            }
            None => None,
        }
    }

    /// Insert a response into the cache.
    pub fn put(&self, key: String, response: AskResponse) {
        let mut inner = self.inner.lock();

        if inner.entries.contains_key(&key) {
            inner.entries.insert(
                key.clone(),
                CacheEntry {
                    response,
                    inserted_at: Instant::now(),
                },
            );
            inner.order.retain(|k| k != &key);
            inner.order.push(key);
            return;
        }

        while inner.entries.len() >= inner.max_size && !inner.order.is_empty() {
            let oldest = inner.order.remove(0);
            inner.entries.remove(&oldest);
        }

        inner.order.push(key.clone());
        inner.entries.insert(
            key,
            CacheEntry {
                response,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Number of entries in the cache.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all entries.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(brief: &str) -> AskResponse {
        AskResponse {
            discussions: Vec::new(),
            links: Vec::new(),
            brief_text: brief.into(),
            has_more_discussions: false,
            has_more_links: false,
        }
    }

    #[test]
    fn test_hit_and_miss() {
        let cache = ResponseCache::new(10, Duration::from_secs(300));
        assert!(cache.get("q1").is_none());

        cache.put("q1".into(), response("hello"));
        assert_eq!(cache.get("q1").unwrap().brief_text, "hello");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_eviction_order() {
        let cache = ResponseCache::new(2, Duration::from_secs(300));
        cache.put("a".into(), response("a"));
        cache.put("b".into(), response("b"));
        cache.put("c".into(), response("c"));

        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = ResponseCache::new(10, Duration::from_millis(1));
        cache.put("ephemeral".into(), response("x"));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("ephemeral").is_none());
    }
}
