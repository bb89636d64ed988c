//! Invalidation-aware response cache for synthesized CSS

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Cached CSS responses, valid for one index generation and a bounded
/// lifetime.
///
/// Every access carries the caller's current index generation; a mismatch
/// flushes the whole cache before anything else happens, so no mutation of
/// the font index can leave a stale stylesheet serving. Font binaries are
/// streamed uncached.
pub struct CssCache {
    lifetime: Duration,
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    generation: u64,
    entries: HashMap<String, CacheEntry>,
}

struct CacheEntry {
    stored_at: Instant,
    css: String,
}

impl CssCache {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            inner: Mutex::new(CacheInner {
                generation: 0,
                entries: HashMap::new(),
            }),
        }
    }

    pub fn get(&self, key: &str, generation: u64) -> Option<String> {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            inner.entries.clear();
            inner.generation = generation;
            return None;
        }

        let expired = match inner.entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() > self.lifetime => true,
            Some(entry) => return Some(entry.css.clone()),
            None => return None,
        };
        if expired {
            inner.entries.remove(key);
        }
        None
    }

    pub fn put(&self, key: String, css: String, generation: u64) {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            inner.entries.clear();
            inner.generation = generation;
        }
        inner.entries.insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                css,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_within_same_generation() {
        let cache = CssCache::new(Duration::from_secs(60));
        cache.put("a".to_string(), "body{}".to_string(), 1);

        assert_eq!(cache.get("a", 1), Some("body{}".to_string()));
        assert_eq!(cache.get("b", 1), None);
    }

    #[test]
    fn generation_change_flushes_everything() {
        let cache = CssCache::new(Duration::from_secs(60));
        cache.put("a".to_string(), "body{}".to_string(), 1);
        cache.put("b".to_string(), "p{}".to_string(), 1);

        assert_eq!(cache.get("a", 2), None);
        // The flush drops every key, not just the queried one.
        assert_eq!(cache.get("b", 2), None);
    }

    #[test]
    fn entries_expire_after_the_lifetime() {
        let cache = CssCache::new(Duration::from_millis(0));
        cache.put("a".to_string(), "body{}".to_string(), 1);

        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get("a", 1), None);
    }
}
