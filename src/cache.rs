use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A thread-safe map whose entries expire after a period without access
pub struct TtlCache<K, V> {
    data: DashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
        }
    }

    /// Get a live entry and push its expiry out by another TTL
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entry = self.data.get_mut(key)?;
        let now = Instant::now();
        if entry.expires_at > now {
            entry.expires_at = now + self.ttl;
            Some(entry.value.clone())
        } else {
            drop(entry);
            self.data.remove(key);
            None
        }
    }

    pub fn insert(&self, key: K, value: V) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.data.insert(key, entry);
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.data.remove(key).map(|(_, entry)| entry.value)
    }

    /// Drop expired entries
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.data.retain(|_, entry| entry.expires_at > now);
    }

    /// Number of entries, including expired ones not yet cleaned up
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Start a background task that purges expired entries hourly
pub fn start_cleanup_task<K, V>(cache: Arc<TtlCache<K, V>>, name: &'static str)
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60 * 60));
        loop {
            interval.tick().await;
            let before = cache.len();
            cache.cleanup();
            let after = cache.len();
            if before != after {
                tracing::debug!(
                    cache = name,
                    removed = before - after,
                    remaining = after,
                    "Cache cleanup completed"
                );
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let cache: TtlCache<u32, String> = TtlCache::new(Duration::from_secs(60));
        cache.insert(1, "one".to_string());
        assert_eq!(cache.get(&1), Some("one".to_string()));
        assert_eq!(cache.remove(&1), Some("one".to_string()));
        assert_eq!(cache.get(&1), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_entry_is_gone() {
        let cache: TtlCache<u32, String> = TtlCache::new(Duration::from_millis(1));
        cache.insert(1, "one".to_string());
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_access_extends_lifetime() {
        let cache: TtlCache<u32, String> = TtlCache::new(Duration::from_millis(500));
        cache.insert(1, "one".to_string());
        for _ in 0..4 {
            std::thread::sleep(Duration::from_millis(200));
            assert!(cache.get(&1).is_some());
        }
    }

    #[test]
    fn test_cleanup() {
        let cache: TtlCache<u32, String> = TtlCache::new(Duration::from_millis(1));
        cache.insert(1, "one".to_string());
        cache.insert(2, "two".to_string());
        std::thread::sleep(Duration::from_millis(10));
        cache.cleanup();
        assert!(cache.is_empty());
    }
}
