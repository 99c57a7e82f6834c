//! Item CRUD handlers.
//!
//! These handlers go through the cached repository, so reads are memoized
//! and every successful write invalidates the cached item entries.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use ignite_core::items::{Item, ItemCreate, ItemUpdate};
use ignite_core::storage::{
    is_valid_limit, ListItems, RepositoryError, SearchItems, MAX_PAGE_SIZE,
};

use crate::{handlers::AppError, state::AppState};

fn check_limit(limit: usize) -> Result<(), RepositoryError> {
    if is_valid_limit(limit) {
        Ok(())
    } else {
        Err(RepositoryError::InvalidData(format!(
            "limit must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, limit
        )))
    }
}

// ============================================================================
// Read
// ============================================================================

/// List items newest first (GET /api/items).
#[axum::debug_handler]
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListItems>,
) -> Result<Json<Vec<Item>>, AppError> {
    check_limit(query.limit)?;

    let items = state.items.list_items(query).await?;

    Ok(Json(items))
}

/// Get a single item by ID (GET /api/items/{id}).
#[axum::debug_handler]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Item>, AppError> {
    let item = state
        .items
        .get_item(id)
        .await?
        .ok_or_else(|| RepositoryError::item_not_found(id))?;

    Ok(Json(item))
}

/// Search items by name or description (GET /api/items/search?q=...).
#[axum::debug_handler]
pub async fn search_items(
    State(state): State<AppState>,
    Query(query): Query<SearchItems>,
) -> Result<Json<Vec<Item>>, AppError> {
    if query.term.is_empty() {
        return Err(RepositoryError::InvalidData("q must not be empty".to_string()).into());
    }
    check_limit(query.limit)?;

    let items = state.items.search_items(&query).await?;

    Ok(Json(items))
}

// ============================================================================
// Write
// ============================================================================

/// Create a new item (POST /api/items).
#[axum::debug_handler]
pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<ItemCreate>,
) -> Result<(StatusCode, Json<Item>), AppError> {
    let item = state.items.create_item(&payload).await?;

    tracing::info!(item_id = %item.id, "Created item");

    Ok((StatusCode::CREATED, Json(item)))
}

/// Update an existing item (PUT /api/items/{id}).
#[axum::debug_handler]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ItemUpdate>,
) -> Result<Json<Item>, AppError> {
    let item = state.items.update_item(id, &payload).await?;

    tracing::info!(item_id = %id, "Updated item");

    Ok(Json(item))
}

/// Delete an item (DELETE /api/items/{id}).
#[axum::debug_handler]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.items.delete_item(id).await?;

    tracing::info!(item_id = %id, "Deleted item");

    Ok(StatusCode::NO_CONTENT)
}
