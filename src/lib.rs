//! Distributed Read-Through Cache Library
//!
//! An embeddable cache where a fleet of peer processes each hold a partition of the
//! cached values. A miss is routed to the peer owning the key over a small HTTP protocol,
//! and falls back to a caller-supplied data source when no peer can answer.
//!
//! ## Architecture Modules
//! - **`storage`**: The per-node state. Immutable `ByteView` values, the byte-bounded
//!   `LruStore`, and the consistent-hash `HashRing` that assigns keys to peers.
//! - **`singleflight`**: Request coalescing. Concurrent misses on one key share a single load.
//! - **`group`**: The orchestrator. Named cache groups combining local store, peer lookup
//!   and the source-of-truth getter, plus the process-wide group registry.
//! - **`transport`**: The peer protocol. `HttpPool` routes keys to peers and serves
//!   requests from them; `HttpGetter` fetches from a single peer.
//! - **`error`**: `CacheError` shared across the crate.
//!
//! ## Example
//! ```ignore
//! use geecache::{GetterFn, HttpPool, new_group};
//! use std::sync::Arc;
//!
//! let group = new_group("scores", 2 << 10, GetterFn(|key: String| async move {
//!     anyhow::Ok(format!("value of {}", key).into_bytes())
//! }));
//! let pool = Arc::new(HttpPool::new("http://localhost:8001"));
//! pool.set(["http://localhost:8001", "http://localhost:8002"]);
//! group.register_peers(pool.clone());
//! // Serve `pool.router()` on port 8001, then:
//! let value = group.get("Tom").await?;
//! ```

pub mod error;
pub mod group;
pub mod singleflight;
pub mod storage;
pub mod transport;

pub use error::{CacheError, Result};
pub use group::group::Group;
pub use group::registry::{get_group, new_group};
pub use group::types::{Getter, GetterFn, PeerGetter, PeerPicker};
pub use singleflight::flight::FlightGroup;
pub use storage::byteview::ByteView;
pub use storage::lru::LruStore;
pub use storage::partitioner::HashRing;
pub use transport::client::HttpGetter;
pub use transport::pool::HttpPool;
