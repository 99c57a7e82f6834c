//! File-system cache backend.
//!
//! Each key owns up to two files inside the cache directory:
//!
//! - `<encoded-key>.json` holds the raw value string.
//! - `<encoded-key>.json.meta` holds `{"created": <secs>, "expiry": <secs>}`
//!   and exists only when the entry was stored with a TTL.
//!
//! Keys are percent-encoded, so every key maps to a distinct filename and can
//! be recovered from it when scanning. All operations in one process are
//! serialized through a single mutex. Nothing coordinates separate processes
//! sharing a directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;

use ignite_core::cache::{paginate, pattern_matches, Cache, CacheError, Result, ScanCursor};

const VALUE_SUFFIX: &str = ".json";
const META_SUFFIX: &str = ".json.meta";

/// Expiry metadata stored next to a value file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct FileMeta {
    created: f64,
    expiry: f64,
}

fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Cache stored as files under one directory.
#[derive(Debug)]
pub struct FileCache {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    #[cfg(test)]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}", urlencoding::encode(key), VALUE_SUFFIX))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}", urlencoding::encode(key), META_SUFFIX))
    }

    /// Returns true if the entry has metadata whose expiry has passed.
    ///
    /// Unreadable metadata counts as expired so a corrupt entry is dropped
    /// instead of being served forever.
    async fn is_expired(&self, key: &str, now: f64) -> Result<bool> {
        let raw = match fs::read_to_string(self.meta_path(key)).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_str::<FileMeta>(&raw) {
            Ok(meta) => Ok(now > meta.expiry),
            Err(err) => {
                tracing::warn!(key, error = %err, "Discarding entry with corrupt cache metadata");
                Ok(true)
            }
        }
    }

    /// Removes both files of an entry. Returns true if the value file existed.
    async fn remove_entry(&self, key: &str) -> Result<bool> {
        let existed = remove_if_exists(&self.value_path(key)).await?;
        remove_if_exists(&self.meta_path(key)).await?;
        Ok(existed)
    }

    /// Lists the keys of every value file in the directory.
    async fn stored_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut dir = fs::read_dir(&self.dir).await?;

        while let Some(entry) = dir.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Some(encoded) = name.strip_suffix(VALUE_SUFFIX) else {
                continue;
            };
            match urlencoding::decode(encoded) {
                Ok(key) => keys.push(key.into_owned()),
                Err(err) => {
                    tracing::debug!(file = name, error = %err, "Skipping foreign file in cache directory")
                }
            }
        }

        Ok(keys)
    }
}

async fn remove_if_exists(path: &Path) -> std::io::Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

#[async_trait]
impl Cache for FileCache {
    fn kind(&self) -> &'static str {
        "file"
    }

    async fn init(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        fs::create_dir_all(&self.dir).await?;
        tracing::debug!(dir = %self.dir.display(), "File cache directory ready");
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;

        let value = match fs::read_to_string(self.value_path(key)).await {
            Ok(value) => value,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        if self.is_expired(key, now_secs()).await? {
            self.remove_entry(key).await?;
            return Ok(None);
        }

        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let _guard = self.lock.lock().await;

        fs::write(self.value_path(key), value).await?;

        match ttl {
            Some(ttl) => {
                let created = now_secs();
                let meta = FileMeta {
                    created,
                    expiry: created + ttl.as_secs_f64(),
                };
                let raw = serde_json::to_string(&meta)
                    .map_err(|e| CacheError::Serialization(e.to_string()))?;
                fs::write(self.meta_path(key), raw).await?;
            }
            None => {
                // A previous TTL must not expire the new value.
                remove_if_exists(&self.meta_path(key)).await?;
            }
        }

        Ok(())
    }

    async fn delete(&self, keys: &[&str]) -> Result<u64> {
        let _guard = self.lock.lock().await;

        let mut removed = 0;
        for key in keys {
            if self.remove_entry(key).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn scan(
        &self,
        cursor: ScanCursor,
        pattern: &str,
        limit: usize,
    ) -> Result<(ScanCursor, Vec<String>)> {
        let _guard = self.lock.lock().await;
        let now = now_secs();

        let mut live = Vec::new();
        for key in self.stored_keys().await? {
            if self.is_expired(&key, now).await? {
                self.remove_entry(&key).await?;
            } else {
                live.push(key);
            }
        }

        live.sort();
        live.retain(|key| pattern_matches(pattern, key));

        Ok(paginate(live, cursor, limit))
    }

    async fn flush(&self) -> Result<()> {
        let _guard = self.lock.lock().await;

        match fs::remove_dir_all(&self.dir).await {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }
}
