use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::serde::deserialize_optional_string;

/// A stored item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Creates an active item stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builds a fresh item from a creation payload.
    pub fn from_create(create: &ItemCreate) -> Self {
        let mut item = Self::new(create.name.clone());
        item.description = create.description.clone();
        item.is_active = create.is_active;
        item
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Sets a specific ID for this item (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Sets a specific creation timestamp (useful for testing).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Returns true if `term` occurs in the name or description, ignoring case.
    pub fn matches_term(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

fn default_active() -> bool {
    true
}

/// Payload for creating an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCreate {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl ItemCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            is_active: true,
        }
    }
}

/// Partial update for an item. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl ItemUpdate {
    /// Returns true when the update carries no field.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.is_active.is_none()
    }

    /// Applies the present fields to `item` and bumps `updated_at`.
    ///
    /// An empty update leaves the item, timestamps included, unchanged.
    pub fn apply_to(&self, item: &mut Item) {
        if self.is_empty() {
            return;
        }
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(description) = &self.description {
            item.description = Some(description.clone());
        }
        if let Some(is_active) = self.is_active {
            item.is_active = is_active;
        }
        item.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_is_active() {
        let item = Item::new("Widget");
        assert!(item.is_active);
        assert_eq!(item.created_at, item.updated_at);
        assert!(item.description.is_none());
    }

    #[test]
    fn test_from_create_copies_fields() {
        let create = ItemCreate {
            name: "Gadget".to_string(),
            description: Some("shiny".to_string()),
            is_active: false,
        };
        let item = Item::from_create(&create);

        assert_eq!(item.name, "Gadget");
        assert_eq!(item.description.as_deref(), Some("shiny"));
        assert!(!item.is_active);
    }

    #[test]
    fn test_create_defaults_when_deserialized() {
        let create: ItemCreate = serde_json::from_str(r#"{"name": "Thing", "description": ""}"#)
            .expect("payload should parse");
        assert!(create.is_active);
        assert!(create.description.is_none());
    }

    #[test]
    fn test_update_applies_present_fields() {
        let mut item = Item::new("Old").with_description("desc");
        let before = item.updated_at;
        let update = ItemUpdate {
            name: Some("New".to_string()),
            is_active: Some(false),
            ..Default::default()
        };

        update.apply_to(&mut item);

        assert_eq!(item.name, "New");
        assert_eq!(item.description.as_deref(), Some("desc"));
        assert!(!item.is_active);
        assert!(item.updated_at >= before);
    }

    #[test]
    fn test_empty_update_is_noop() {
        let mut item = Item::new("Same");
        let snapshot = item.clone();

        let update = ItemUpdate::default();
        assert!(update.is_empty());
        update.apply_to(&mut item);

        assert_eq!(item, snapshot);
    }

    #[test]
    fn test_matches_term_case_insensitive() {
        let item = Item::new("Blue Lamp").with_description("Made of BRASS");
        assert!(item.matches_term("lamp"));
        assert!(item.matches_term("brass"));
        assert!(!item.matches_term("chair"));
    }

    #[test]
    fn test_item_serde_roundtrip() {
        let item = Item::new("Roundtrip").with_description("d");
        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
