//! Peer Transport Module
//!
//! HTTP plumbing between cache nodes.
//!
//! ## Core Concepts
//! - **Routing**: `HttpPool` places every peer on a consistent-hash ring and picks the owner of a key.
//! - **Fetching**: `HttpGetter` asks a single peer for `(group, key)`.
//! - **Serving**: the pool's router answers the same requests from other peers.
//!
//! ## Submodules
//! - **`client`**: outbound requests (`HttpGetter`).
//! - **`handlers`**: axum handler mounted under the base path.
//! - **`pool`**: peer membership, key routing and inbound request handling (`HttpPool`).
//! - **`protocol`**: wire constants and the `PeerReply` response type.

pub mod client;
pub mod handlers;
pub mod pool;
pub mod protocol;
