use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

use crate::error::Result;

/// Source of truth consulted when no cache (local or remote) has a key.
#[async_trait]
pub trait Getter: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

/// Adapts an async closure into a [`Getter`].
///
/// ```ignore
/// let getter = GetterFn(|key: String| async move { Ok(key.into_bytes()) });
/// ```
pub struct GetterFn<F>(pub F);

#[async_trait]
impl<F, Fut> Getter for GetterFn<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Vec<u8>>> + Send + 'static,
{
    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self.0)(key.to_string()).await
    }
}

/// Locates the peer that owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns `None` when the key belongs to this node (or there are no peers).
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

/// Fetches a value for `(group, key)` from one remote peer.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>>;
}
