//! Local Storage Module
//!
//! Everything a single node needs to hold its share of the cache.
//!
//! ## Core Concepts
//! - **Values**: `ByteView` is the immutable payload handed to callers.
//! - **Eviction**: `LruStore` bounds memory by bytes and drops the least recently used entry first.
//! - **Placement**: `HashRing` decides which peer owns a key (consistent hashing with virtual nodes).

pub mod byteview;
pub(crate) mod cache;
pub mod lru;
pub mod partitioner;
