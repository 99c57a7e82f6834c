//! Redis cache implementation.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Config as PoolConfig, Connection, Pool, Runtime};
use redis::AsyncCommands;
use tokio::sync::RwLock;

use ignite_core::cache::{Cache, CacheError, Result, ScanCursor};

use super::error::{map_pool_error, map_redis_error};

/// Redis cache backend using a bounded connection pool.
pub struct RedisCache {
    url: String,
    pool_size: usize,
    pool: RwLock<Option<Pool>>,
}

impl RedisCache {
    /// Creates a backend for `url`. No connection is made until first use.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379/0")
    /// * `pool_size` - Maximum number of pooled connections
    pub fn new(url: impl Into<String>, pool_size: usize) -> Self {
        Self {
            url: url.into(),
            pool_size: pool_size.max(1),
            pool: RwLock::new(None),
        }
    }

    fn build_pool(&self) -> Result<Pool> {
        let mut config = PoolConfig::from_url(self.url.clone());
        config.pool = Some(deadpool_redis::PoolConfig::new(self.pool_size));
        config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| CacheError::ConnectionFailed(format!("Failed to create Redis pool: {e}")))
    }

    /// Returns the pool, creating it if this is the first use since `close`.
    async fn pool(&self) -> Result<Pool> {
        if let Some(pool) = self.pool.read().await.as_ref() {
            return Ok(pool.clone());
        }

        let mut slot = self.pool.write().await;
        if let Some(pool) = slot.as_ref() {
            return Ok(pool.clone());
        }

        let pool = self.build_pool()?;
        tracing::debug!(pool_size = self.pool_size, "Redis pool created");
        *slot = Some(pool.clone());
        Ok(pool)
    }

    async fn connection(&self) -> Result<Connection> {
        self.pool().await?.get().await.map_err(map_pool_error)
    }
}

/// Converts a TTL to the `PSETEX` argument, never less than one millisecond.
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl Cache for RedisCache {
    fn kind(&self) -> &'static str {
        "redis"
    }

    async fn init(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if let Some(pool) = self.pool.write().await.take() {
            pool.close();
            tracing::debug!("Redis pool closed");
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.connection().await?;

        match ttl {
            Some(duration) => {
                conn.pset_ex::<_, _, ()>(key, value, ttl_millis(duration))
                    .await
                    .map_err(map_redis_error)?;
            }
            None => {
                conn.set::<_, _, ()>(key, value)
                    .await
                    .map_err(map_redis_error)?;
            }
        }

        Ok(())
    }

    async fn delete(&self, keys: &[&str]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.connection().await?;
        let removed: u64 = conn.del(keys.to_vec()).await.map_err(map_redis_error)?;
        Ok(removed)
    }

    async fn scan(
        &self,
        cursor: ScanCursor,
        pattern: &str,
        limit: usize,
    ) -> Result<(ScanCursor, Vec<String>)> {
        let mut conn = self.connection().await?;

        // COUNT is a hint to the server, so a page can hold more than `limit`.
        let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor.position())
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(limit.max(1))
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;

        Ok((ScanCursor::new(next), keys))
    }

    async fn flush(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: () = redis::cmd("FLUSHDB")
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use uuid::Uuid;

    /// Helper to get Redis URL from environment.
    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    /// Skip test if Redis not available.
    async fn get_test_cache() -> Option<RedisCache> {
        let cache = RedisCache::new(redis_url(), 2);
        cache.init().await.ok().map(|_| cache)
    }

    /// Generate a unique key namespace to avoid conflicts.
    fn test_namespace() -> String {
        format!("test:redis_cache:{}", Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_redis_set_and_get() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = format!("{}:set_get", test_namespace());
        cache.set(&key, "hello world", None).await.unwrap();

        assert_eq!(cache.get(&key).await.unwrap(), Some("hello world".to_string()));

        cache.delete(&[&key]).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_ttl_expiration() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = format!("{}:ttl", test_namespace());
        cache
            .set(&key, "v", Some(Duration::from_millis(1500)))
            .await
            .unwrap();

        // Still present past the whole-second boundary.
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(cache.get(&key).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(cache.get(&key).await.unwrap(), None);
    }

    #[test]
    fn test_ttl_millis_keeps_fractional_seconds() {
        assert_eq!(ttl_millis(Duration::from_millis(1900)), 1900);
        assert_eq!(ttl_millis(Duration::from_micros(10)), 1);
        assert_eq!(ttl_millis(Duration::from_secs(u64::MAX)), u64::MAX);
    }

    #[tokio::test]
    async fn test_redis_delete_counts_existing_keys() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let ns = test_namespace();
        let k1 = format!("{ns}:k1");
        let k2 = format!("{ns}:k2");
        cache.set(&k1, "v", None).await.unwrap();

        assert_eq!(cache.delete(&[&k1, &k2]).await.unwrap(), 1);
        assert_eq!(cache.get(&k1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_redis_scan_visits_all_matches() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let ns = test_namespace();
        let keys = [
            format!("{ns}:user:1"),
            format!("{ns}:user:2"),
            format!("{ns}:item:1"),
        ];
        for key in &keys {
            cache.set(key, "v", Some(Duration::from_secs(60))).await.unwrap();
        }

        let pattern = format!("{ns}:user:*");
        let mut seen = BTreeSet::new();
        let mut cursor = ScanCursor::START;
        loop {
            let (next, page) = cache.scan(cursor, &pattern, 1).await.unwrap();
            seen.extend(page);
            if next.is_terminal() {
                break;
            }
            cursor = next;
        }

        let expected: BTreeSet<String> = keys[..2].iter().cloned().collect();
        assert_eq!(seen, expected);

        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        cache.delete(&refs).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_close_then_reuse() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        cache.close().await.unwrap();
        cache.close().await.unwrap();

        // The pool is rebuilt on demand.
        let key = format!("{}:reopen", test_namespace());
        cache.set(&key, "v", None).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some("v"));
        cache.delete(&[&key]).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_unreachable_reports_error() {
        let cache = RedisCache::new("redis://127.0.0.1:1", 1);
        assert!(cache.get("anything").await.is_err());
        assert!(cache.close().await.is_ok());
    }
}
