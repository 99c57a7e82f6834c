//! Cache backend implementations and the wrappers built on them.
//!
//! The concrete backends implement [`ignite_core::cache::Cache`]:
//!
//! - [`MemoryCache`]: process-local map
//! - [`FileCache`]: one file per key under a directory
//! - [`RedisCache`]: Redis through a connection pool
//!
//! The service never calls them directly. It goes through the infallible
//! [`CacheBackend`] facade obtained from a [`CacheFactory`], and uses
//! [`Memoize`] and [`Invalidate`] for read-through caching and invalidation.

pub(crate) mod backend;
mod factory;
mod file;
mod invalidate;
mod memoize;
mod memory;
mod redis_impl;

pub use backend::CacheBackend;
pub use factory::CacheFactory;
pub use file::FileCache;
pub use invalidate::{invalidate_pattern, Invalidate, DEFAULT_BATCH_SIZE};
pub use memoize::Memoize;
pub use memory::MemoryCache;
pub use redis_impl::RedisCache;
