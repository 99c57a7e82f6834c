//! Redis cache backend.
//!
//! Talks to a Redis server through a bounded `deadpool-redis` pool. The pool
//! is built on `init`, or on first use when `init` was skipped, and dropped
//! on `close`.

mod cache;
mod error;

pub use cache::RedisCache;
