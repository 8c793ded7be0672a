//! HTTP Peer Pool
//!
//! `HttpPool` is both sides of the peer protocol for one node:
//! - **Outbound**: as a `PeerPicker`, it maps a key to its owner on the hash ring and
//!   hands back that peer's `HttpGetter` (or `None` when this node owns the key).
//! - **Inbound**: `serve_path` answers `GET <base_path><group>/<key>` from other peers
//!   by looking the group up in the registry.

use axum::routing::get;
use axum::{Extension, Router};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::client::HttpGetter;
use super::handlers::handle_peer_request;
use super::protocol::{DEFAULT_BASE_PATH, DEFAULT_REPLICAS, PeerReply};
use crate::group::registry::get_group;
use crate::group::types::{PeerGetter, PeerPicker};
use crate::storage::partitioner::HashRing;

struct PoolState {
    peers: HashRing,
    /// Peer address (e.g. `http://10.0.0.2:8008`) -> client for that peer.
    http_getters: HashMap<String, Arc<HttpGetter>>,
}

pub struct HttpPool {
    /// This node's own address, e.g. `http://example.net:8000`.
    self_addr: String,
    base_path: String,
    http_client: reqwest::Client,
    state: Mutex<PoolState>,
}

impl HttpPool {
    pub fn new(self_addr: impl Into<String>) -> Self {
        Self::with_base_path(self_addr, DEFAULT_BASE_PATH)
    }

    /// Creates a pool answering under `base_path`. Leading and trailing
    /// slashes are added when missing.
    pub fn with_base_path(self_addr: impl Into<String>, base_path: &str) -> Self {
        let cleaned = base_path.trim_matches('/');
        let base_path = if cleaned.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", cleaned)
        };

        Self {
            self_addr: self_addr.into(),
            base_path,
            http_client: reqwest::Client::new(),
            state: Mutex::new(PoolState {
                peers: HashRing::new(DEFAULT_REPLICAS),
                http_getters: HashMap::new(),
            }),
        }
    }

    /// Uses `http_client` (timeouts, pooling, TLS settings) for requests to
    /// peers added by later calls to [`HttpPool::set`].
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = http_client;
        self
    }

    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Replaces the peer set. `peers` must be the complete membership,
    /// including this node's own address.
    pub fn set<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let peers: Vec<String> = peers.into_iter().map(Into::into).collect();

        let mut ring = HashRing::new(DEFAULT_REPLICAS);
        ring.add(&peers);

        let http_getters = peers
            .iter()
            .map(|peer| {
                let getter = HttpGetter::with_client(
                    format!("{}{}", peer, self.base_path),
                    self.http_client.clone(),
                );
                (peer.clone(), Arc::new(getter))
            })
            .collect();

        *self.state.lock() = PoolState {
            peers: ring,
            http_getters,
        };

        tracing::info!("[Server {}] Peer set updated: {:?}", self.self_addr, peers);
    }

    /// Answers one peer request for `path` (the raw, still percent-encoded URI path).
    ///
    /// # Panics
    /// If `path` does not start with the pool's base path: the pool was
    /// mounted at the wrong route.
    pub async fn serve_path(&self, path: &str) -> PeerReply {
        let Some(rest) = path.strip_prefix(self.base_path.as_str()) else {
            panic!("HttpPool serving unexpected path: {}", path);
        };
        tracing::info!("[Server {}] GET {}", self.self_addr, path);

        let parts: Vec<&str> = rest.splitn(2, '/').collect();
        if parts.len() != 2 {
            return PeerReply::bad_request();
        }

        let (Ok(group_name), Ok(key)) =
            (urlencoding::decode(parts[0]), urlencoding::decode(parts[1]))
        else {
            return PeerReply::bad_request();
        };

        let Some(group) = get_group(&group_name) else {
            return PeerReply::no_such_group(&group_name);
        };

        match group.get(&key).await {
            Ok(view) => PeerReply::value(view.shared()),
            Err(e) => {
                tracing::error!("[Server {}] Failed to get {}/{}: {}", self.self_addr, group_name, key, e);
                PeerReply::error(axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }

    /// An axum router serving the peer protocol under the base path, ready to
    /// be merged into the application's router.
    pub fn router(self: &Arc<Self>) -> Router {
        // The wildcard needs a non-empty remainder; the bare base path still gets a 400.
        Router::new()
            .route(&self.base_path, get(handle_peer_request))
            .route(&format!("{}*rest", self.base_path), get(handle_peer_request))
            .layer(Extension(self.clone()))
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.lock();
        let peer = state.peers.get(key)?;
        if peer == self.self_addr {
            return None;
        }

        tracing::debug!("[Server {}] Pick peer {}", self.self_addr, peer);
        let getter = state.http_getters.get(peer)?.clone();
        Some(getter)
    }
}
