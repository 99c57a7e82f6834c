//! Cached item repository decorator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use ignite_core::cache::{item_pattern, items_list_key, items_pattern};
use ignite_core::items::{Item, ItemCreate, ItemUpdate};
use ignite_core::storage::{ItemRepository, ListItems, Result, SearchItems};

use crate::cache::{CacheBackend, Invalidate, Memoize};

/// How long a memoized listing stays fresh.
pub const LIST_TTL: Duration = Duration::from_secs(60);

/// Arguments hashed into the single-item cache key.
#[derive(Debug, Clone, Copy, Serialize)]
struct GetItemArgs {
    item_id: Uuid,
}

/// Cached item repository decorator.
///
/// - `get_item` is memoized under `item:CachedItemRepository::get_item:<hash>`
///   with the configured TTL.
/// - `list_items` is memoized under `items:<active_only>:<skip>:<limit>` for
///   [`LIST_TTL`].
/// - `search_items` always reaches the repository.
/// - Successful writes invalidate `item:*` and `items:*`.
pub struct CachedItemRepository<R>
where
    R: ItemRepository,
{
    repository: Arc<R>,
    get_memo: Memoize<GetItemArgs>,
    list_memo: Memoize<ListItems>,
    invalidate: Invalidate,
}

impl<R> CachedItemRepository<R>
where
    R: ItemRepository,
{
    /// Creates a new cached item repository.
    ///
    /// # Arguments
    ///
    /// * `repository` - The underlying repository to cache
    /// * `backend` - The cache backend shared with the rest of the service
    /// * `ttl` - Time-to-live for memoized single-item lookups
    pub fn new(repository: Arc<R>, backend: CacheBackend, ttl: Duration) -> Self {
        let get_memo = Memoize::new(
            backend.clone(),
            "CachedItemRepository::get_item",
            Some(ttl),
        )
        .with_prefix("item");

        let list_memo = Memoize::new(
            backend.clone(),
            "CachedItemRepository::list_items",
            Some(LIST_TTL),
        )
        .with_key_builder(|query: &ListItems| {
            items_list_key(query.active_only, query.skip, query.limit)
        });

        let invalidate = Invalidate::new(backend, [item_pattern(), items_pattern()]);

        Self {
            repository,
            get_memo,
            list_memo,
            invalidate,
        }
    }

    /// Sets how many keys each invalidation round trip scans and deletes.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.invalidate = self.invalidate.with_batch_size(batch_size);
        self
    }
}

#[async_trait]
impl<R> ItemRepository for CachedItemRepository<R>
where
    R: ItemRepository + 'static,
{
    async fn get_item(&self, id: Uuid) -> Result<Option<Item>> {
        self.get_memo
            .call(GetItemArgs { item_id: id }, |args| {
                self.repository.get_item(args.item_id)
            })
            .await
    }

    async fn list_items(&self, query: ListItems) -> Result<Vec<Item>> {
        self.list_memo
            .call(query, |query| self.repository.list_items(query))
            .await
    }

    async fn search_items(&self, query: &SearchItems) -> Result<Vec<Item>> {
        self.repository.search_items(query).await
    }

    async fn create_item(&self, create: &ItemCreate) -> Result<Item> {
        let item = self
            .invalidate
            .call(|| self.repository.create_item(create))
            .await?;
        tracing::debug!(item_id = %item.id, "Item created");
        Ok(item)
    }

    async fn update_item(&self, id: Uuid, update: &ItemUpdate) -> Result<Item> {
        let item = self
            .invalidate
            .call(|| self.repository.update_item(id, update))
            .await?;
        tracing::debug!(item_id = %id, "Item updated");
        Ok(item)
    }

    async fn delete_item(&self, id: Uuid) -> Result<()> {
        self.invalidate
            .call(|| self.repository.delete_item(id))
            .await?;
        tracing::debug!(item_id = %id, "Item deleted");
        Ok(())
    }
}
