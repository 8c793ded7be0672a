use parking_lot::Mutex;

use super::byteview::ByteView;
use super::lru::LruStore;

/// Concurrency-safe wrapper around a group's [`LruStore`].
///
/// The store is created on first insert. Critical sections never perform I/O.
pub(crate) struct LocalCache {
    cache_bytes: usize,
    lru: Mutex<Option<LruStore<ByteView>>>,
}

impl LocalCache {
    pub(crate) fn new(cache_bytes: usize) -> Self {
        Self {
            cache_bytes,
            lru: Mutex::new(None),
        }
    }

    pub(crate) fn add(&self, key: &str, value: ByteView) {
        let mut guard = self.lru.lock();
        let cache_bytes = self.cache_bytes;
        guard
            .get_or_insert_with(|| {
                LruStore::with_eviction(cache_bytes, |key, value: &ByteView| {
                    tracing::debug!("Evicted key {} ({} bytes)", key, value.len());
                })
            })
            .add(key, value);
    }

    pub(crate) fn get(&self, key: &str) -> Option<ByteView> {
        self.lru.lock().as_mut()?.get(key).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.lru.lock().as_ref().map(LruStore::len).unwrap_or(0)
    }

    pub(crate) fn used_bytes(&self) -> usize {
        self.lru
            .lock()
            .as_ref()
            .map(LruStore::used_bytes)
            .unwrap_or(0)
    }
}
