//! Cache inspection and management handlers.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use ignite_core::cache::{deserialize_value, direct_item_key, item_pattern, serialize_value};
use ignite_core::items::Item;
use ignite_core::storage::RepositoryError;

use crate::{
    cache::invalidate_pattern,
    config::redact_redis_url,
    handlers::AppError,
    state::AppState,
};

/// TTL of entries written by the direct lookup.
const DIRECT_TTL: Duration = Duration::from_secs(300);

/// Response body of the cache clearing endpoint.
#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    pub message: String,
    pub deleted_count: u64,
}

/// Response body of the cache info endpoint.
#[derive(Debug, Serialize)]
pub struct CacheInfoResponse {
    pub cache_backend_type: String,
    pub cache_ttl_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_cache_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis_uri: Option<String>,
}

/// Get an item using the cache backend directly (GET /api/items/cached/{id}).
///
/// Reads `direct:item:<id>` and falls back to the store on a miss, caching
/// the item for five minutes. Entries that no longer decode are reloaded.
#[axum::debug_handler]
pub async fn get_item_cached(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Item>, AppError> {
    let key = direct_item_key(id);

    if let Some(raw) = state.cache.get(&key).await {
        match deserialize_value::<Item>(&raw) {
            Ok(item) => {
                tracing::debug!(key = %key, "Direct cache hit");
                return Ok(Json(item));
            }
            Err(err) => tracing::warn!(key = %key, error = %err, "Discarding cached item"),
        }
    }

    let item = state
        .store
        .get_item(id)
        .await?
        .ok_or_else(|| RepositoryError::item_not_found(id))?;

    match serialize_value(&item) {
        Ok(raw) => {
            state.cache.set(&key, &raw, Some(DIRECT_TTL)).await;
        }
        Err(err) => tracing::warn!(key = %key, error = %err, "Item is not cacheable"),
    }

    Ok(Json(item))
}

/// Remove every cached single-item entry (GET /api/items/cache/clear).
#[axum::debug_handler]
pub async fn clear_item_cache(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    let batch_size = state.config.cache.invalidate_batch_size;
    let deleted_count = invalidate_pattern(&state.cache, item_pattern(), batch_size).await;

    Json(ClearCacheResponse {
        message: format!("Successfully cleared {} cached items", deleted_count),
        deleted_count,
    })
}

/// Describe the configured cache (GET /api/items/cache/info).
#[axum::debug_handler]
pub async fn cache_info(State(state): State<AppState>) -> Json<CacheInfoResponse> {
    let cache = &state.config.cache;
    let kind = state.cache.kind();

    Json(CacheInfoResponse {
        cache_backend_type: kind.to_string(),
        cache_ttl_seconds: cache.ttl_seconds,
        file_cache_path: (kind == "file").then(|| cache.file_path.clone()),
        redis_uri: (kind == "redis").then(|| redact_redis_url(&cache.redis_url)),
    })
}
