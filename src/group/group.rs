//! Cache Group
//!
//! A `Group` is a named cache namespace. Its `get` path is:
//! 1. **Local hit**: served straight from this node's `LruStore`.
//! 2. **Remote owner**: if a peer picker names another node, ask that node.
//!    Values fetched this way are *not* stored locally; the owner caches them.
//! 3. **Local sourcing**: otherwise (or if the peer fails) call the getter and
//!    populate the local store.
//!
//! Steps 2 and 3 run inside a `FlightGroup`, so concurrent misses for the same
//! key trigger only one peer request or getter call.

use once_cell::sync::OnceCell;
use std::sync::Arc;

use super::types::{Getter, PeerGetter, PeerPicker};
use crate::error::{CacheError, Result};
use crate::singleflight::flight::FlightGroup;
use crate::storage::byteview::ByteView;
use crate::storage::cache::LocalCache;

pub struct Group {
    name: String,
    getter: Arc<dyn Getter>,
    main_cache: LocalCache,
    peers: OnceCell<Arc<dyn PeerPicker>>,
    loader: FlightGroup<Result<ByteView>>,
}

impl Group {
    pub(crate) fn new(name: &str, cache_bytes: usize, getter: Arc<dyn Getter>) -> Self {
        Self {
            name: name.to_string(),
            getter,
            main_cache: LocalCache::new(cache_bytes),
            peers: OnceCell::new(),
            loader: FlightGroup::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of entries currently held in this node's store.
    pub fn cached_entries(&self) -> usize {
        self.main_cache.len()
    }

    /// Bytes currently accounted to this node's store.
    pub fn cached_bytes(&self) -> usize {
        self.main_cache.used_bytes()
    }

    /// Wires remote routing into this group.
    ///
    /// # Panics
    /// If a picker was already registered.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) {
        if self.peers.set(peers).is_err() {
            panic!("register_peers called more than once for group {}", self.name);
        }
    }

    pub async fn get(self: &Arc<Self>, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::KeyRequired);
        }

        if let Some(value) = self.main_cache.get(key) {
            tracing::debug!("[{}] cache hit for {}", self.name, key);
            return Ok(value);
        }

        self.load(key).await
    }

    /// Loads `key` once for every overlapping caller. The load owns a handle
    /// to the group, so it completes even if all callers are dropped.
    async fn load(self: &Arc<Self>, key: &str) -> Result<ByteView> {
        let group = self.clone();
        let owned_key = key.to_string();

        self.loader
            .run(key, move || async move { group.load_uncoalesced(&owned_key).await })
            .await
    }

    async fn load_uncoalesced(&self, key: &str) -> Result<ByteView> {
        if let Some(picker) = self.peers.get()
            && let Some(peer) = picker.pick_peer(key)
        {
            match self.get_from_peer(peer.as_ref(), key).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transport() => {
                    tracing::warn!("[{}] Peer request for {} failed: {}", self.name, key, e);
                }
                Err(e) => {
                    tracing::warn!("[{}] Peer could not load {}: {}", self.name, key, e);
                }
            }
        }

        self.get_locally(key).await
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = self
            .getter
            .get(key)
            .await
            .map_err(CacheError::source_error)?;

        let value = ByteView::copy_from(&bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }

    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let bytes = peer.get(&self.name, key).await?;
        Ok(ByteView::from_owned(bytes))
    }
}
