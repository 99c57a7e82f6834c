use serde::{Deserialize, Serialize};

/// Largest page size accepted by listing and search queries.
pub const MAX_PAGE_SIZE: usize = 100;

fn default_limit() -> usize {
    MAX_PAGE_SIZE
}

/// Paging and filter options for listing items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItems {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub active_only: bool,
}

impl Default for ListItems {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: MAX_PAGE_SIZE,
            active_only: false,
        }
    }
}

/// Paging options for a term search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItems {
    #[serde(rename = "q")]
    pub term: String,
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl SearchItems {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            skip: 0,
            limit: MAX_PAGE_SIZE,
        }
    }
}

/// Returns true when `limit` is an accepted page size.
pub fn is_valid_limit(limit: usize) -> bool {
    (1..=MAX_PAGE_SIZE).contains(&limit)
}
