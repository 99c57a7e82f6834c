//! Memoization of asynchronous lookups.
//!
//! A [`Memoize`] binds a backend, a qualified function name and a TTL. Its
//! [`call`](Memoize::call) method returns a cached result when one exists
//! and otherwise runs the supplied computation and caches a successful
//! result. Cache faults never change the outcome of the computation.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use ignite_core::cache::{
    default_excluded_args, deserialize_value, memo_key, serialize_value, SerializationError,
    DEFAULT_KEY_PREFIX,
};

use super::CacheBackend;

type KeyBuilder<A> = Arc<dyn Fn(&A) -> String + Send + Sync>;

/// Caches the results of one asynchronous function keyed by its arguments.
///
/// `A` is the argument set of the wrapped function. By default the key is
/// `<prefix>:<name>:<md5 of the canonical JSON of A>`, with top-level fields
/// named in the exclusion set left out of the hash.
pub struct Memoize<A> {
    backend: CacheBackend,
    name: String,
    ttl: Option<Duration>,
    prefix: String,
    exclude: BTreeSet<String>,
    key_builder: Option<KeyBuilder<A>>,
}

impl<A> Clone for Memoize<A> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            name: self.name.clone(),
            ttl: self.ttl,
            prefix: self.prefix.clone(),
            exclude: self.exclude.clone(),
            key_builder: self.key_builder.clone(),
        }
    }
}

impl<A: Serialize> Memoize<A> {
    /// Creates a memoizer for the function called `name`.
    ///
    /// `ttl` of `None` caches results without expiry.
    pub fn new(backend: CacheBackend, name: impl Into<String>, ttl: Option<Duration>) -> Self {
        Self {
            backend,
            name: name.into(),
            ttl,
            prefix: DEFAULT_KEY_PREFIX.to_string(),
            exclude: default_excluded_args(),
            key_builder: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Replaces the hashed key with one computed by `builder`.
    pub fn with_key_builder<F>(mut self, builder: F) -> Self
    where
        F: Fn(&A) -> String + Send + Sync + 'static,
    {
        self.key_builder = Some(Arc::new(builder));
        self
    }

    /// Adds argument names to leave out of the hashed key.
    #[allow(dead_code)]
    pub fn excluding<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(names.into_iter().map(Into::into));
        self
    }

    /// Returns the cache key for `args`.
    pub fn key_for(&self, args: &A) -> Result<String, SerializationError> {
        match &self.key_builder {
            Some(builder) => Ok(builder(args)),
            None => memo_key(&self.prefix, &self.name, args, &self.exclude),
        }
    }

    /// Returns the cached result for `args`, or runs `f` and caches its result.
    ///
    /// `f` runs at most once. A hit that no longer decodes as `R` is treated as
    /// a miss. `Err` results are returned as they are and never cached.
    pub async fn call<R, E, F, Fut>(&self, args: A, f: F) -> Result<R, E>
    where
        R: Serialize + DeserializeOwned,
        F: FnOnce(A) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let key = match self.key_for(&args) {
            Ok(key) => Some(key),
            Err(err) => {
                tracing::warn!(function = %self.name, error = %err, "Could not build cache key");
                None
            }
        };

        if let Some(key) = key.as_deref() {
            match self.backend.get(key).await {
                Some(raw) => match deserialize_value::<R>(&raw) {
                    Ok(value) => {
                        tracing::debug!(function = %self.name, key, "Cache hit");
                        return Ok(value);
                    }
                    Err(err) => {
                        tracing::warn!(
                            function = %self.name,
                            key,
                            error = %err,
                            "Discarding undecodable cache entry"
                        );
                    }
                },
                None => tracing::debug!(function = %self.name, key, "Cache miss"),
            }
        }

        let result = f(args).await;

        let Some(key) = key else {
            return result;
        };

        let encoded = match &result {
            Ok(value) => match serialize_value(value) {
                Ok(raw) => Some(raw),
                Err(err) => {
                    tracing::warn!(
                        function = %self.name,
                        key = %key,
                        error = %err,
                        "Result is not cacheable"
                    );
                    None
                }
            },
            Err(_) => None,
        };

        if let Some(raw) = encoded {
            self.backend.set(&key, &raw, self.ttl).await;
        }

        result
    }
}
