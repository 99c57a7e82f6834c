//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use ignite_core::items::{validate_create, validate_update, Item, ItemCreate, ItemUpdate};
use ignite_core::storage::{ItemRepository, ListItems, RepositoryError, Result, SearchItems};

/// In-memory item store.
///
/// Uses a HashMap wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    items: Arc<RwLock<HashMap<Uuid, Item>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an item as is, keeping its id and timestamps.
    #[cfg(test)]
    pub async fn insert(&self, item: Item) {
        self.items.write().await.insert(item.id, item);
    }
}

/// Sorts newest first, breaking timestamp ties by id for a stable order.
fn newest_first(items: &mut [Item]) {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
}

fn page(items: Vec<Item>, skip: usize, limit: usize) -> Vec<Item> {
    items.into_iter().skip(skip).take(limit).collect()
}

#[async_trait]
impl ItemRepository for InMemoryRepository {
    async fn get_item(&self, id: Uuid) -> Result<Option<Item>> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    async fn list_items(&self, query: ListItems) -> Result<Vec<Item>> {
        let mut matching: Vec<Item> = {
            let items = self.items.read().await;
            items
                .values()
                .filter(|item| !query.active_only || item.is_active)
                .cloned()
                .collect()
        };
        newest_first(&mut matching);
        Ok(page(matching, query.skip, query.limit))
    }

    async fn search_items(&self, query: &SearchItems) -> Result<Vec<Item>> {
        let mut matching: Vec<Item> = {
            let items = self.items.read().await;
            items
                .values()
                .filter(|item| item.matches_term(&query.term))
                .cloned()
                .collect()
        };
        newest_first(&mut matching);
        Ok(page(matching, query.skip, query.limit))
    }

    async fn create_item(&self, create: &ItemCreate) -> Result<Item> {
        validate_create(create)?;

        let item = Item::from_create(create);
        self.items.write().await.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_item(&self, id: Uuid, update: &ItemUpdate) -> Result<Item> {
        validate_update(update)?;

        let mut items = self.items.write().await;
        let item = items
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::item_not_found(id))?;
        update.apply_to(item);
        Ok(item.clone())
    }

    async fn delete_item(&self, id: Uuid) -> Result<()> {
        let mut items = self.items.write().await;
        if items.remove(&id).is_none() {
            return Err(RepositoryError::item_not_found(id));
        }
        Ok(())
    }
}
