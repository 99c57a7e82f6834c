//! Cached repository decorators.
//!
//! Reads go through [`Memoize`](crate::cache::Memoize) and writes through
//! [`Invalidate`](crate::cache::Invalidate):
//!
//! - **Reads**: look up the cache first, on a miss fetch from the repository
//!   and populate the cache
//! - **Writes**: persist to the repository, then drop every cached item and
//!   listing

mod item;

pub use item::CachedItemRepository;
