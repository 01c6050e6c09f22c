use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// Process-local key/value cache with per-entry expiry.
///
/// Expiry is lazy: an entry past its deadline is removed by the read that
/// observes it and reported as a miss. There is no background sweep and no
/// capacity bound. Clones share the same backing map, so a service graph can
/// hold the cache by value.
///
/// A `TtlCache::new()` that nothing ever writes to is a valid degraded mode:
/// every operation is safe on an empty map.
#[derive(Clone)]
pub struct TtlCache<V> {
    entries: Arc<DashMap<String, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Store a value under `key`, expiring `ttl` from now. Overwrites any
    /// previous entry and its deadline.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.entries.insert(
            key.into(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Fetch a live value. An expired entry behaves as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) => {
                if Instant::now() < entry.expires_at {
                    return Some(entry.value.clone());
                }
                true
            }
            None => false,
        };

        // The shard guard is dropped before removal; removing while holding
        // it would deadlock.
        if expired {
            self.entries.remove(key);
        }
        None
    }

    /// Remove `key` unconditionally. Idempotent: absent keys are a no-op.
    pub fn delete(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Number of entries currently stored, including not-yet-collected
    /// expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_on_empty_cache_is_a_miss() {
        let cache: TtlCache<String> = TtlCache::new();
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_set_then_get_within_ttl() {
        let cache = TtlCache::new();
        cache.set("k", 42u32, Duration::from_secs(60));
        assert_eq!(cache.get("k"), Some(42));
    }

    #[test]
    fn test_expired_entry_is_a_miss_and_is_removed() {
        let cache = TtlCache::new();
        cache.set("k", 1u32, Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let cache = TtlCache::new();
        cache.set("k", 1u32, Duration::from_secs(60));

        cache.delete("k");
        cache.delete("k");
        cache.delete("never-existed");
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_clones_share_the_backing_map() {
        let cache = TtlCache::new();
        let view = cache.clone();

        cache.set("k", 7u32, Duration::from_secs(60));
        assert_eq!(view.get("k"), Some(7));

        view.delete("k");
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_set_overwrites_value_and_deadline() {
        let cache = TtlCache::new();
        cache.set("k", 1u32, Duration::from_millis(0));
        cache.set("k", 2u32, Duration::from_secs(60));

        assert_eq!(cache.get("k"), Some(2));
    }
}
