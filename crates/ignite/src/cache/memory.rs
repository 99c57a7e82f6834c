//! In-memory cache backend.
//!
//! A sorted map behind a single async mutex. Entries carry an optional
//! expiry instant and are dropped lazily when `get` or `scan` finds them
//! expired; there is no background sweep.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use ignite_core::cache::{paginate, pattern_matches, Cache, Result, ScanCursor};

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    created_at: Instant,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    /// A TTL whose expiry instant cannot be represented never expires.
    fn new(value: String, ttl: Option<Duration>) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            expires_at: ttl.and_then(|d| now.checked_add(d)),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now > exp)
    }
}

/// Process-local cache. Contents do not survive `close` or a restart.
#[derive(Debug, Default)]
pub struct MemoryCache {
    store: Mutex<BTreeMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn init(&self) -> Result<()> {
        self.store.lock().await.clear();
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.store.lock().await.clear();
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut store = self.store.lock().await;

        match store.get(key) {
            Some(entry) if entry.is_expired(Instant::now()) => {
                store.remove(key);
                Ok(None)
            }
            Some(entry) => {
                tracing::trace!(
                    key,
                    age_ms = entry.created_at.elapsed().as_millis() as u64,
                    "Memory cache hit"
                );
                Ok(Some(entry.value.clone()))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let mut store = self.store.lock().await;
        store.insert(key.to_string(), CacheEntry::new(value.to_string(), ttl));
        Ok(())
    }

    async fn delete(&self, keys: &[&str]) -> Result<u64> {
        let mut store = self.store.lock().await;
        let removed = keys
            .iter()
            .filter(|key| store.remove(**key).is_some())
            .count();
        Ok(removed as u64)
    }

    async fn scan(
        &self,
        cursor: ScanCursor,
        pattern: &str,
        limit: usize,
    ) -> Result<(ScanCursor, Vec<String>)> {
        let mut store = self.store.lock().await;
        let now = Instant::now();

        store.retain(|_, entry| !entry.is_expired(now));

        // BTreeMap iteration is already in key order.
        let matching: Vec<String> = store
            .keys()
            .filter(|key| pattern_matches(pattern, key))
            .cloned()
            .collect();

        Ok(paginate(matching, cursor, limit))
    }

    async fn flush(&self) -> Result<()> {
        self.store.lock().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    async fn seeded(keys: &[&str]) -> MemoryCache {
        let cache = MemoryCache::new();
        cache.init().await.unwrap();
        for key in keys {
            cache.set(key, "v", None).await.unwrap();
        }
        cache
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new();

        cache.set("key1", "value1", None).await.unwrap();

        assert_eq!(cache.get("key1").await.unwrap(), Some("value1".to_string()));
        assert_eq!(cache.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = MemoryCache::new();

        cache.set("key", "old", None).await.unwrap();
        cache.set("key", "new", None).await.unwrap();

        assert_eq!(cache.get("key").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = MemoryCache::new();

        cache
            .set("short", "v", Some(Duration::from_millis(50)))
            .await
            .unwrap();
        cache.set("long", "v", None).await.unwrap();
        assert!(cache.get("short").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.get("short").await.unwrap(), None);
        assert!(cache.get("long").await.unwrap().is_some());

        let (_, keys) = cache.scan(ScanCursor::START, "*", 10).await.unwrap();
        assert_eq!(keys, vec!["long".to_string()]);
    }

    #[tokio::test]
    async fn test_huge_ttl_is_kept_without_expiry() {
        let cache = MemoryCache::new();

        cache
            .set("forever", "v", Some(Duration::from_secs(u64::MAX)))
            .await
            .unwrap();

        assert_eq!(cache.get("forever").await.unwrap(), Some("v".to_string()));
        let (_, keys) = cache.scan(ScanCursor::START, "*", 10).await.unwrap();
        assert_eq!(keys, vec!["forever".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_counts_existing_keys() {
        let cache = seeded(&["k1"]).await;

        assert_eq!(cache.delete(&["k1", "k2"]).await.unwrap(), 1);
        assert_eq!(cache.get("k1").await.unwrap(), None);
        assert_eq!(cache.delete(&["k1"]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_scan_with_limit_one_visits_all_matches() {
        let cache = seeded(&["user:1", "user:2", "item:1"]).await;

        let mut seen = BTreeSet::new();
        let mut cursor = ScanCursor::START;
        loop {
            let (next, keys) = cache.scan(cursor, "user:*", 1).await.unwrap();
            assert!(keys.len() <= 1);
            seen.extend(keys);
            if next.is_terminal() {
                break;
            }
            cursor = next;
        }

        let expected: BTreeSet<String> = ["user:1", "user:2"].iter().map(|s| s.to_string()).collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_flush_removes_everything() {
        let cache = seeded(&["a", "b"]).await;

        cache.flush().await.unwrap();

        let (next, keys) = cache.scan(ScanCursor::START, "*", 10).await.unwrap();
        assert!(keys.is_empty());
        assert!(next.is_terminal());
    }

    #[tokio::test]
    async fn test_close_discards_contents() {
        let cache = seeded(&["a"]).await;

        cache.close().await.unwrap();
        cache.init().await.unwrap();

        assert_eq!(cache.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_close_without_init() {
        let cache = MemoryCache::new();
        assert!(cache.close().await.is_ok());
    }
}
