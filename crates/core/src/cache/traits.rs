use std::time::Duration;

use async_trait::async_trait;

use super::{Result, ScanCursor};

/// Capability contract every cache backend satisfies.
///
/// Implementations report faults through [`CacheError`](super::CacheError).
/// Callers in the service never see those errors directly: they go through
/// a facade that logs them and degrades to neutral values.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Short backend name used in logs and the cache info endpoint.
    fn kind(&self) -> &'static str;

    /// Prepares the backend for use. Calling it more than once is harmless.
    async fn init(&self) -> Result<()>;

    /// Releases backend resources. Safe to call without a prior `init`.
    async fn close(&self) -> Result<()>;

    /// Gets a value by key. Expired entries are reported as absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores a value, replacing any previous one. With a TTL the entry stops
    /// being visible to `get` and `scan` once the TTL has elapsed.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    /// Deletes the given keys and returns how many of them existed.
    async fn delete(&self, keys: &[&str]) -> Result<u64>;

    /// Returns up to `limit` keys matching `pattern`, resuming at `cursor`.
    ///
    /// A returned cursor of [`ScanCursor::START`] means the scan is complete.
    async fn scan(
        &self,
        cursor: ScanCursor,
        pattern: &str,
        limit: usize,
    ) -> Result<(ScanCursor, Vec<String>)>;

    /// Removes every entry held by the backend.
    async fn flush(&self) -> Result<()>;
}
