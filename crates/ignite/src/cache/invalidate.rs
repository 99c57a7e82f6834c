//! Pattern-based invalidation around mutations.

use std::future::Future;

use super::CacheBackend;

/// Number of keys scanned and deleted per round trip.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Deletes every key matching `pattern` and returns how many were removed.
///
/// All matching keys are collected before anything is deleted, so deletions
/// cannot shift the offset cursors of local backends and hide keys from the
/// scan. Backend faults are logged by the facade and count as zero.
pub async fn invalidate_pattern(backend: &CacheBackend, pattern: &str, batch_size: usize) -> u64 {
    let batch_size = batch_size.max(1);
    let keys = backend.scan_all(pattern, batch_size).await;

    let mut deleted = 0;
    for batch in keys.chunks(batch_size) {
        let refs: Vec<&str> = batch.iter().map(String::as_str).collect();
        deleted += backend.delete(&refs).await;
    }

    tracing::info!(pattern, deleted, "Invalidated cache keys");
    deleted
}

/// Runs a mutation and then removes cache entries it made stale.
#[derive(Debug, Clone)]
pub struct Invalidate {
    backend: CacheBackend,
    patterns: Vec<String>,
    batch_size: usize,
}

impl Invalidate {
    pub fn new<I, S>(backend: CacheBackend, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            backend,
            patterns: patterns.into_iter().map(Into::into).collect(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Invalidates every configured pattern and returns the total removed.
    pub async fn invalidate(&self) -> u64 {
        let mut total = 0;
        for pattern in &self.patterns {
            total += invalidate_pattern(&self.backend, pattern, self.batch_size).await;
        }
        total
    }

    /// Runs `f`, then invalidates if it succeeded.
    ///
    /// The result of `f` is returned unchanged. A failed mutation changed
    /// nothing, so no entries are removed.
    pub async fn call<T, E, F, Fut>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let result = f().await;
        if result.is_ok() {
            self.invalidate().await;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::cache::backend::tests::FailingCache;
    use crate::cache::{FileCache, MemoryCache};

    async fn seed(backend: &CacheBackend, keys: &[&str]) {
        for key in keys {
            assert!(backend.set(key, "v", None).await);
        }
    }

    #[tokio::test]
    async fn test_invalidate_pattern_removes_only_matches() {
        let backend = CacheBackend::new(MemoryCache::new());
        seed(&backend, &["item:1", "item:2", "items:true:0:10", "user:1"]).await;

        let deleted = invalidate_pattern(&backend, "item:*", 100).await;

        assert_eq!(deleted, 2);
        assert_eq!(backend.get("item:1").await, None);
        assert!(backend.get("items:true:0:10").await.is_some());
        assert!(backend.get("user:1").await.is_some());
    }

    #[tokio::test]
    async fn test_small_batches_delete_everything() {
        let backend = CacheBackend::new(MemoryCache::new());
        let keys: Vec<String> = (0..25).map(|i| format!("item:{i:02}")).collect();
        for key in &keys {
            backend.set(key, "v", None).await;
        }

        let deleted = invalidate_pattern(&backend, "item:*", 3).await;

        assert_eq!(deleted, 25);
        assert!(backend.scan_all("*", 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_small_batches_on_file_backend() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = CacheBackend::new(FileCache::new(tmp.path()));
        backend.init().await;
        for i in 0..7 {
            backend
                .set(&format!("item:{i}"), "v", Some(Duration::from_secs(60)))
                .await;
        }

        assert_eq!(invalidate_pattern(&backend, "item:*", 2).await, 7);
        assert!(backend.scan_all("item:*", 2).await.is_empty());
    }

    #[tokio::test]
    async fn test_call_invalidates_on_success() {
        let backend = CacheBackend::new(MemoryCache::new());
        seed(&backend, &["item:1", "items:false:0:100"]).await;
        let invalidate = Invalidate::new(backend.clone(), ["item:*", "items:*"]);

        let result: Result<u32, String> = invalidate.call(|| async { Ok(42) }).await;

        assert_eq!(result, Ok(42));
        assert!(backend.scan_all("*", 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_call_skips_invalidation_on_error() {
        let backend = CacheBackend::new(MemoryCache::new());
        seed(&backend, &["item:1"]).await;
        let invalidate = Invalidate::new(backend.clone(), ["item:*"]);

        let result: Result<(), String> = invalidate
            .call(|| async { Err("rejected".to_string()) })
            .await;

        assert_eq!(result, Err("rejected".to_string()));
        assert!(backend.get("item:1").await.is_some());
    }

    #[tokio::test]
    async fn test_failing_backend_does_not_break_mutation() {
        let invalidate = Invalidate::new(CacheBackend::new(FailingCache), ["item:*"]);

        let result: Result<&str, String> = invalidate.call(|| async { Ok("saved") }).await;

        assert_eq!(result, Ok("saved"));
        assert_eq!(invalidate.invalidate().await, 0);
    }
}
