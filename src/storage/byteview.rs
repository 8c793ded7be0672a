use bytes::Bytes;
use std::borrow::Cow;
use std::fmt;

use super::lru::ByteSize;

/// An immutable view over a cached payload.
///
/// Clones share the same buffer. Nothing hands out a mutable reference to it:
/// [`ByteView::byte_slice`] returns a fresh copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteView {
    b: Bytes,
}

impl ByteView {
    /// Copies `data` into a new view, so later changes to the caller's buffer
    /// never reach the cache.
    pub fn copy_from(data: &[u8]) -> Self {
        Self {
            b: Bytes::copy_from_slice(data),
        }
    }

    /// Takes ownership of a buffer nobody else holds (e.g. a response body).
    pub(crate) fn from_owned(data: Vec<u8>) -> Self {
        Self { b: Bytes::from(data) }
    }

    pub fn len(&self) -> usize {
        self.b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// Returns a copy of the payload.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.b.to_vec()
    }

    /// Payload as text, replacing invalid UTF-8 sequences.
    pub fn as_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.b)
    }

    /// Read-only handle on the shared buffer for the in-process response path.
    pub(crate) fn shared(&self) -> Bytes {
        self.b.clone()
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str_lossy())
    }
}

impl ByteSize for ByteView {
    fn byte_size(&self) -> usize {
        self.len()
    }
}
