//! Pure functions for converting values to and from cache strings.
//!
//! Cached values are stored as JSON text, which keeps them readable when
//! inspecting a file directory or a Redis keyspace.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::CacheError;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

impl From<SerializationError> for CacheError {
    fn from(err: SerializationError) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes a value to its cached JSON form.
pub fn serialize_value<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes a cached JSON string.
pub fn deserialize_value<T: DeserializeOwned>(raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Widget {
        id: u32,
        label: Option<String>,
    }

    #[test]
    fn test_roundtrip_struct() {
        let widget = Widget {
            id: 7,
            label: Some("seven".to_string()),
        };

        let raw = serialize_value(&widget).expect("serialize should succeed");
        let back: Widget = deserialize_value(&raw).expect("deserialize should succeed");

        assert_eq!(back, widget);
    }

    #[test]
    fn test_option_none_is_cached_as_null() {
        let raw = serialize_value(&None::<Widget>).unwrap();
        assert_eq!(raw, "null");

        let back: Option<Widget> = deserialize_value(&raw).unwrap();
        assert!(back.is_none());
    }

    #[test]
    fn test_deserialize_malformed() {
        let result: Result<Widget> = deserialize_value("not valid json");
        assert!(matches!(result, Err(SerializationError::DeserializeFailed(_))));
    }

    #[test]
    fn test_deserialize_wrong_shape() {
        let result: Result<Vec<Widget>> = deserialize_value("{\"id\": 1}");
        assert!(matches!(result, Err(SerializationError::DeserializeFailed(_))));
    }

    #[test]
    fn test_into_cache_error() {
        let err: CacheError = SerializationError::SerializeFailed("boom".to_string()).into();
        assert_eq!(
            err,
            CacheError::Serialization("Failed to serialize: boom".to_string())
        );
    }
}
