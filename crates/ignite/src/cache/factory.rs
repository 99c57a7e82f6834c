//! Backend selection and the process-wide cache instance.

use std::fmt;
use std::sync::Mutex;

use crate::config::CacheConfig;

use super::{CacheBackend, FileCache, MemoryCache, RedisCache};

/// The three available cache engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Remote,
    File,
    Memory,
}

impl BackendKind {
    /// Parses a configured backend name.
    ///
    /// Unknown names select the in-memory backend and log a warning; a bad
    /// setting never prevents the service from starting.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "redis" | "remote" => BackendKind::Remote,
            "file" => BackendKind::File,
            "memory" => BackendKind::Memory,
            other => {
                tracing::warn!(
                    backend_type = other,
                    "Unknown cache backend type, falling back to memory"
                );
                BackendKind::Memory
            }
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Remote => "redis",
            BackendKind::File => "file",
            BackendKind::Memory => "memory",
        };
        f.write_str(name)
    }
}

/// Constructs the backend selected by `config`. No I/O happens here.
pub fn build_backend(config: &CacheConfig) -> CacheBackend {
    let kind = BackendKind::parse(&config.backend_type);
    tracing::info!(backend = %kind, "Creating cache backend");

    match kind {
        BackendKind::Remote => {
            CacheBackend::new(RedisCache::new(&config.redis_url, config.redis_pool_size))
        }
        BackendKind::File => CacheBackend::new(FileCache::new(&config.file_path)),
        BackendKind::Memory => CacheBackend::new(MemoryCache::new()),
    }
}

/// Owner of the single cache backend used by a process.
///
/// Every call to [`backend`](Self::backend) returns a handle to the same
/// instance until [`close`](Self::close) resets it.
#[derive(Debug)]
pub struct CacheFactory {
    config: CacheConfig,
    instance: Mutex<Option<CacheBackend>>,
}

impl CacheFactory {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            instance: Mutex::new(None),
        }
    }

    /// Returns the shared backend, constructing it on first use.
    pub fn backend(&self) -> CacheBackend {
        let mut slot = self
            .instance
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.get_or_insert_with(|| build_backend(&self.config))
            .clone()
    }

    /// Initializes the shared backend.
    pub async fn init(&self) {
        self.backend().init().await;
    }

    /// Closes the shared backend, if one was built, and forgets it.
    pub async fn close(&self) {
        let current = self
            .instance
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        if let Some(backend) = current {
            backend.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(backend_type: &str) -> CacheConfig {
        CacheConfig {
            backend_type: backend_type.to_string(),
            ..CacheConfig::default()
        }
    }

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!(BackendKind::parse("redis"), BackendKind::Remote);
        assert_eq!(BackendKind::parse("remote"), BackendKind::Remote);
        assert_eq!(BackendKind::parse("file"), BackendKind::File);
        assert_eq!(BackendKind::parse("memory"), BackendKind::Memory);
        assert_eq!(BackendKind::parse(" Redis "), BackendKind::Remote);
    }

    #[test]
    fn test_parse_unknown_falls_back_to_memory() {
        assert_eq!(BackendKind::parse("bogus"), BackendKind::Memory);
        assert_eq!(BackendKind::parse(""), BackendKind::Memory);
    }

    #[test]
    fn test_build_backend_kinds() {
        assert_eq!(build_backend(&config_for("memory")).kind(), "memory");
        assert_eq!(build_backend(&config_for("file")).kind(), "file");
        assert_eq!(build_backend(&config_for("redis")).kind(), "redis");
    }

    #[tokio::test]
    async fn test_unknown_backend_type_is_usable_memory() {
        let factory = CacheFactory::new(config_for("bogus"));
        factory.init().await;

        let backend = factory.backend();
        assert_eq!(backend.kind(), "memory");
        assert!(backend.set("k", "v", None).await);
        assert_eq!(backend.get("k").await.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_backend_is_shared() {
        let factory = CacheFactory::new(config_for("memory"));

        let first = factory.backend();
        let second = factory.backend();
        assert!(first.same_as(&second));

        first.set("shared", "yes", None).await;
        assert_eq!(second.get("shared").await.as_deref(), Some("yes"));
    }

    #[tokio::test]
    async fn test_close_resets_instance() {
        let factory = CacheFactory::new(config_for("memory"));

        let before = factory.backend();
        factory.close().await;
        let after = factory.backend();

        assert!(!before.same_as(&after));
    }

    #[tokio::test]
    async fn test_close_without_backend_is_noop() {
        let factory = CacheFactory::new(config_for("memory"));
        factory.close().await;
    }
}
