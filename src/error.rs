//! Error types shared by the cache core.
//!
//! Errors are `Clone` because a single load result is handed to every caller
//! that joined the same in-flight call.

use std::sync::Arc;
use thiserror::Error;

/// Result type alias using [`CacheError`].
pub type Result<T> = std::result::Result<T, CacheError>;

#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// `Group::get` was called with an empty key.
    #[error("key is required")]
    KeyRequired,

    /// The group's getter failed. Displays the getter's own message.
    #[error("{0}")]
    Source(Arc<anyhow::Error>),

    /// A peer answered with something other than 200 OK.
    #[error("peer {peer} returned: {status}")]
    PeerStatus { peer: String, status: String },

    /// The request to a peer failed before a status was received, or the body
    /// could not be read.
    #[error("request to peer {peer} failed: {reason}")]
    Transport { peer: String, reason: String },
}

impl CacheError {
    pub fn source_error(err: anyhow::Error) -> Self {
        CacheError::Source(Arc::new(err))
    }

    /// True for failures talking to a remote peer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CacheError::PeerStatus { .. } | CacheError::Transport { .. }
        )
    }
}
