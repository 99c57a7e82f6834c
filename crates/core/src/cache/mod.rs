mod cursor;
mod error;
mod keys;
mod patterns;
mod serialization;
mod traits;

pub use cursor::{paginate, ScanCursor};
pub use error::{CacheError, Result};
pub use keys::{
    args_digest, default_excluded_args, direct_item_key, item_pattern, items_list_key,
    items_pattern, memo_key, DEFAULT_EXCLUDED_ARGS, DEFAULT_KEY_PREFIX,
};
pub use patterns::pattern_matches;
pub use serialization::{deserialize_value, serialize_value, SerializationError};
pub use traits::Cache;
