//! Item repository implementations.
//!
//! - [`InMemoryRepository`]: the source of truth, held in process memory
//! - [`CachedItemRepository`]: read-through cache decorator over any
//!   [`ItemRepository`](ignite_core::storage::ItemRepository)

mod cached;
mod inmemory;

pub use cached::CachedItemRepository;
pub use inmemory::InMemoryRepository;
