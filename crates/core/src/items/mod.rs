mod types;
mod validation;

pub use types::{Item, ItemCreate, ItemUpdate};
pub use validation::{
    validate_create, validate_name, validate_update, ItemValidationError, MAX_NAME_LEN,
};
