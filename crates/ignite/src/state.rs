//! Application state shared by all request handlers.

use std::sync::Arc;

use ignite_core::storage::ItemRepository;

use crate::cache::{CacheBackend, CacheFactory};
use crate::config::Config;
use crate::storage::{CachedItemRepository, InMemoryRepository};

/// Shared application state.
///
/// Cloned for each request handler. All clones observe the same repository
/// and the same cache backend instance.
#[derive(Clone)]
pub struct AppState {
    /// Item repository with read-through caching.
    pub items: Arc<dyn ItemRepository>,
    /// The underlying store, for handlers that manage the cache themselves.
    pub store: Arc<dyn ItemRepository>,
    /// Cache backend handed out by the factory.
    pub cache: CacheBackend,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the repositories to the factory's backend.
    pub fn new(config: Config, cache_factory: &CacheFactory) -> Self {
        let cache = cache_factory.backend();
        let store = Arc::new(InMemoryRepository::new());
        let items = Arc::new(
            CachedItemRepository::new(store.clone(), cache.clone(), config.cache.ttl())
                .with_batch_size(config.cache.invalidate_batch_size),
        );

        Self {
            items,
            store,
            cache,
            config: Arc::new(config),
        }
    }

    /// Builds the state and its factory from one configuration.
    pub fn from_config(config: Config) -> Self {
        let factory = CacheFactory::new(config.cache.clone());
        Self::new(config, &factory)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(Config::default())
    }
}
