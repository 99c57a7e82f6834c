use async_trait::async_trait;
use uuid::Uuid;

use crate::items::{Item, ItemCreate, ItemUpdate};

use super::{ListItems, Result, SearchItems};

/// Repository for item operations.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Gets an item by its ID.
    async fn get_item(&self, id: Uuid) -> Result<Option<Item>>;

    /// Lists items newest first.
    async fn list_items(&self, query: ListItems) -> Result<Vec<Item>>;

    /// Finds items whose name or description contains the term, ignoring case.
    async fn search_items(&self, query: &SearchItems) -> Result<Vec<Item>>;

    /// Creates a new item and returns it.
    async fn create_item(&self, create: &ItemCreate) -> Result<Item>;

    /// Applies an update and returns the stored item.
    ///
    /// Fails with `NotFound` when the item does not exist.
    async fn update_item(&self, id: Uuid, update: &ItemUpdate) -> Result<Item>;

    /// Deletes an item by its ID. Fails with `NotFound` when it does not exist.
    async fn delete_item(&self, id: Uuid) -> Result<()>;
}
