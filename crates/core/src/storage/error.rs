use thiserror::Error;

use crate::items::ItemValidationError;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// Shorthand for a missing item.
    pub fn item_not_found(id: impl ToString) -> Self {
        RepositoryError::NotFound {
            entity_type: "Item",
            id: id.to_string(),
        }
    }
}

impl From<ItemValidationError> for RepositoryError {
    fn from(err: ItemValidationError) -> Self {
        RepositoryError::InvalidData(err.to_string())
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
