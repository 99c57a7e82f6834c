//! Pure validation functions for item payloads.

use thiserror::Error;

use super::{ItemCreate, ItemUpdate};

/// Longest accepted item name, in characters.
pub const MAX_NAME_LEN: usize = 255;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    #[error("Item name must not be empty")]
    EmptyName,
    #[error("Item name must be at most {max} characters, got {len}")]
    NameTooLong { len: usize, max: usize },
}

/// Validates an item name.
pub fn validate_name(name: &str) -> Result<(), ItemValidationError> {
    if name.trim().is_empty() {
        return Err(ItemValidationError::EmptyName);
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ItemValidationError::NameTooLong {
            len,
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

pub fn validate_create(create: &ItemCreate) -> Result<(), ItemValidationError> {
    validate_name(&create.name)
}

pub fn validate_update(update: &ItemUpdate) -> Result<(), ItemValidationError> {
    match &update.name {
        Some(name) => validate_name(name),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_name() {
        assert!(validate_name("Lamp").is_ok());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(validate_name(""), Err(ItemValidationError::EmptyName));
        assert_eq!(validate_name("   "), Err(ItemValidationError::EmptyName));
    }

    #[test]
    fn test_name_too_long_counts_chars() {
        let name = "é".repeat(MAX_NAME_LEN + 1);
        assert_eq!(
            validate_name(&name),
            Err(ItemValidationError::NameTooLong { len: 256, max: 255 })
        );
        // Multibyte characters count once.
        assert!(validate_name(&"é".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn test_update_without_name_is_valid() {
        assert!(validate_update(&ItemUpdate::default()).is_ok());
        let bad = ItemUpdate {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_update(&bad).is_err());
    }

    #[test]
    fn test_validate_create() {
        assert!(validate_create(&ItemCreate::new("ok")).is_ok());
        assert!(validate_create(&ItemCreate::new("")).is_err());
    }
}
