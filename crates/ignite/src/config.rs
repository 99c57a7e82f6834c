use std::{env, str::FromStr, time::Duration};

use crate::cache::DEFAULT_BATCH_SIZE;

/// Cache settings loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Backend selector: "memory", "file", "redis" or "remote" (default: "memory")
    pub backend_type: String,
    /// Default memoization TTL in seconds (default: 300)
    pub ttl_seconds: u64,
    /// Directory used by the file backend (default: "cache")
    pub file_path: String,
    /// Redis connection URL, taken from `REDIS_URL` or built from its parts
    pub redis_url: String,
    /// Maximum pooled Redis connections (default: 10)
    pub redis_pool_size: usize,
    /// Keys scanned and deleted per round trip when invalidating (default: 100)
    pub invalidate_batch_size: usize,
}

impl CacheConfig {
    /// Get cache TTL as a Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend_type: "memory".to_string(),
            ttl_seconds: 300,
            file_path: "cache".to_string(),
            redis_url: redis_url_from_parts("localhost", 6379, None, 0),
            redis_pool_size: 10,
            invalidate_batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub cache: CacheConfig,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_BACKEND_TYPE` - Cache backend (default: "memory")
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 300)
    /// - `CACHE_FILE_PATH` - File backend directory (default: "cache")
    /// - `REDIS_URL` - Redis connection URL (default: built from the parts below)
    /// - `REDIS_HOST` / `REDIS_PORT` / `REDIS_PASSWORD` / `REDIS_DB` -
    ///   URL parts (default: "localhost" / 6379 / none / 0)
    /// - `REDIS_POOL_SIZE` - Maximum pooled connections (default: 10)
    /// - `CACHE_INVALIDATE_BATCH_SIZE` - Keys per invalidation batch (default: 100)
    /// - `REQUEST_TIMEOUT_SECONDS` - Per-request timeout (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = CacheConfig::default();

        let redis_url = lookup("REDIS_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| {
                redis_url_from_parts(
                    &lookup("REDIS_HOST").unwrap_or_else(|| "localhost".to_string()),
                    parse_var(&lookup, "REDIS_PORT").unwrap_or(6379),
                    lookup("REDIS_PASSWORD").as_deref(),
                    parse_var(&lookup, "REDIS_DB").unwrap_or(0),
                )
            });

        Self {
            cache: CacheConfig {
                backend_type: lookup("CACHE_BACKEND_TYPE").unwrap_or(defaults.backend_type),
                ttl_seconds: parse_var(&lookup, "CACHE_TTL_SECONDS")
                    .unwrap_or(defaults.ttl_seconds),
                file_path: lookup("CACHE_FILE_PATH").unwrap_or(defaults.file_path),
                redis_url,
                redis_pool_size: parse_var(&lookup, "REDIS_POOL_SIZE")
                    .unwrap_or(defaults.redis_pool_size),
                invalidate_batch_size: parse_var(&lookup, "CACHE_INVALIDATE_BATCH_SIZE")
                    .filter(|size: &usize| *size > 0)
                    .unwrap_or(defaults.invalidate_batch_size),
            },
            request_timeout_seconds: parse_var(&lookup, "REQUEST_TIMEOUT_SECONDS")
                .unwrap_or(10),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            request_timeout_seconds: 10,
        }
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(name).and_then(|v| v.trim().parse().ok())
}

/// Builds `redis://[:password@]host:port/db`.
pub fn redis_url_from_parts(host: &str, port: u16, password: Option<&str>, db: u32) -> String {
    match password.filter(|p| !p.is_empty()) {
        Some(password) => format!(
            "redis://:{}@{}:{}/{}",
            urlencoding::encode(password),
            host,
            port,
            db
        ),
        None => format!("redis://{}:{}/{}", host, port, db),
    }
}

/// Returns `url` with any password replaced by `***`, for display.
pub fn redact_redis_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    match rest.rsplit_once('@') {
        Some((credentials, host)) => {
            let user = credentials.split(':').next().unwrap_or_default();
            format!("{}://{}:***@{}", scheme, user, host)
        }
        None => url.to_string(),
    }
}
