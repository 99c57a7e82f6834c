use std::collections::BTreeSet;

use md5::{Digest, Md5};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::serialization::{Result, SerializationError};

/// Prefix used by memoized functions when none is configured.
pub const DEFAULT_KEY_PREFIX: &str = "cache";

/// Argument names never included in a memoization key.
///
/// These name handles to receivers, requests and connections, whose state is
/// not an input to the cached computation.
pub const DEFAULT_EXCLUDED_ARGS: [&str; 6] = ["self", "cls", "request", "db", "session", "cache"];

/// Returns the default excluded argument names as an owned set.
pub fn default_excluded_args() -> BTreeSet<String> {
    DEFAULT_EXCLUDED_ARGS.iter().map(|s| s.to_string()).collect()
}

/// Returns the cache key for a memoized call: `<prefix>:<name>:<md5-hex>`.
///
/// The hash covers the canonical JSON of `args` (object keys sorted at every
/// depth) after dropping top-level fields whose name is in `exclude`. Equal
/// arguments therefore always produce the same key, whatever the order in
/// which their fields were serialized.
///
/// # Examples
///
/// ```
/// use ignite_core::cache::{default_excluded_args, memo_key};
/// use serde_json::json;
///
/// let exclude = default_excluded_args();
/// let a = memo_key("cache", "lookup", &json!({"id": 1, "db": "handle"}), &exclude).unwrap();
/// let b = memo_key("cache", "lookup", &json!({"id": 1}), &exclude).unwrap();
/// assert_eq!(a, b);
/// assert!(a.starts_with("cache:lookup:"));
/// ```
pub fn memo_key<A: Serialize + ?Sized>(
    prefix: &str,
    name: &str,
    args: &A,
    exclude: &BTreeSet<String>,
) -> Result<String> {
    Ok(format!("{}:{}:{}", prefix, name, args_digest(args, exclude)?))
}

/// Returns the lowercase hex MD5 digest of the canonical argument JSON.
pub fn args_digest<A: Serialize + ?Sized>(args: &A, exclude: &BTreeSet<String>) -> Result<String> {
    let value =
        serde_json::to_value(args).map_err(|e| SerializationError::SerializeFailed(e.to_string()))?;

    let value = match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .filter(|(name, _)| !exclude.contains(name))
                .collect(),
        ),
        other => other,
    };

    let canonical = serde_json::to_string(&canonicalize(value))
        .map_err(|e| SerializationError::SerializeFailed(e.to_string()))?;

    Ok(hex::encode(Md5::digest(canonical.as_bytes())))
}

/// Rebuilds a JSON value with object keys in sorted order at every depth.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(fields) => {
            let mut entries: Vec<(String, Value)> = fields.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (name, inner) in entries {
                sorted.insert(name, canonicalize(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Returns the pattern matching every memoized single-item lookup.
pub fn item_pattern() -> &'static str {
    "item:*"
}

/// Returns the pattern matching every memoized item listing.
pub fn items_pattern() -> &'static str {
    "items:*"
}

/// Returns the cache key for a memoized item listing.
pub fn items_list_key(active_only: bool, skip: usize, limit: usize) -> String {
    format!("items:{}:{}:{}", active_only, skip, limit)
}

/// Returns the cache key used by the direct cache lookup endpoint.
pub fn direct_item_key(item_id: Uuid) -> String {
    format!("direct:item:{}", item_id)
}
