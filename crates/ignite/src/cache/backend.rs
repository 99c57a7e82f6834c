//! Infallible cache facade.
//!
//! [`CacheBackend`] is what the rest of the service talks to. It forwards to
//! a concrete [`Cache`] and turns every backend fault into a logged warning
//! plus a neutral value, so a broken cache degrades to "no caching" instead of
//! failing requests.

use std::sync::Arc;
use std::time::Duration;

use ignite_core::cache::{Cache, ScanCursor};

/// Cloneable handle to one cache backend.
#[derive(Clone)]
pub struct CacheBackend {
    inner: Arc<dyn Cache>,
}

impl std::fmt::Debug for CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheBackend")
            .field("kind", &self.inner.kind())
            .finish()
    }
}

impl CacheBackend {
    pub fn new(cache: impl Cache + 'static) -> Self {
        Self {
            inner: Arc::new(cache),
        }
    }

    /// Name of the wrapped backend.
    pub fn kind(&self) -> &'static str {
        self.inner.kind()
    }

    /// Returns true if both handles point at the same backend instance.
    #[cfg(test)]
    pub fn same_as(&self, other: &CacheBackend) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub async fn init(&self) {
        match self.inner.init().await {
            Ok(()) => tracing::debug!(backend = self.kind(), "Cache backend initialized"),
            Err(err) => {
                tracing::warn!(backend = self.kind(), error = %err, "Cache init failed")
            }
        }
    }

    pub async fn close(&self) {
        match self.inner.close().await {
            Ok(()) => tracing::debug!(backend = self.kind(), "Cache backend closed"),
            Err(err) => {
                tracing::warn!(backend = self.kind(), error = %err, "Cache close failed")
            }
        }
    }

    /// Returns the value for `key`, or `None` on a miss or a backend fault.
    pub async fn get(&self, key: &str) -> Option<String> {
        match self.inner.get(key).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(backend = self.kind(), key, error = %err, "Cache get failed");
                None
            }
        }
    }

    /// Stores `value` under `key`. Returns false if the backend failed.
    pub async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> bool {
        match self.inner.set(key, value, ttl).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(backend = self.kind(), key, error = %err, "Cache set failed");
                false
            }
        }
    }

    /// Deletes `keys` and returns how many existed. A fault counts as zero.
    pub async fn delete(&self, keys: &[&str]) -> u64 {
        if keys.is_empty() {
            return 0;
        }
        match self.inner.delete(keys).await {
            Ok(removed) => removed,
            Err(err) => {
                tracing::warn!(
                    backend = self.kind(),
                    count = keys.len(),
                    error = %err,
                    "Cache delete failed"
                );
                0
            }
        }
    }

    /// Returns one page of matching keys.
    ///
    /// A fault ends the scan: the caller receives [`ScanCursor::START`] and
    /// no keys, so scan loops always terminate.
    pub async fn scan(
        &self,
        cursor: ScanCursor,
        pattern: &str,
        limit: usize,
    ) -> (ScanCursor, Vec<String>) {
        match self.inner.scan(cursor, pattern, limit).await {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(
                    backend = self.kind(),
                    %cursor,
                    pattern,
                    error = %err,
                    "Cache scan failed"
                );
                (ScanCursor::START, Vec::new())
            }
        }
    }

    /// Removes every entry. Returns false if the backend failed.
    #[allow(dead_code)]
    pub async fn flush(&self) -> bool {
        match self.inner.flush().await {
            Ok(()) => {
                tracing::info!(backend = self.kind(), "Cache flushed");
                true
            }
            Err(err) => {
                tracing::warn!(backend = self.kind(), error = %err, "Cache flush failed");
                false
            }
        }
    }

    /// Collects every key matching `pattern` by scanning to completion.
    pub async fn scan_all(&self, pattern: &str, limit: usize) -> Vec<String> {
        let mut keys = Vec::new();
        let mut cursor = ScanCursor::START;
        loop {
            let (next, page) = self.scan(cursor, pattern, limit).await;
            keys.extend(page);
            if next.is_terminal() {
                break;
            }
            cursor = next;
        }
        keys
    }
}
