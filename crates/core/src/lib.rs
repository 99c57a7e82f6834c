//! Core types and pure functions for ignite.
//!
//! This crate holds everything that does not perform I/O: the cache
//! contract and its error types, glob matching, key construction and
//! hashing, the items domain model and the repository contract. Concrete
//! backends and the HTTP service live in the `ignite` crate.

pub mod cache;
pub mod items;
pub mod serde;
pub mod storage;
