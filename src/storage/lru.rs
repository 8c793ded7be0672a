//! Bounded LRU Store
//!
//! A byte-capacity key/value map that evicts the least recently used entry
//! once the tracked size goes over `max_bytes`.
//!
//! ## Layout
//! Entries live in a slab (`Vec<Option<Node>>`) and are chained into a doubly
//! linked recency list through slot indices. `head` is the most recently used
//! entry, `tail` the least recently used. Freed slots are recycled through a
//! free list, so indices stay stable for the lifetime of an entry.
//!
//! The size of an entry is `key.len() + value.byte_size()`.

use std::collections::HashMap;

/// Anything that can report how many bytes it occupies in the store.
pub trait ByteSize {
    fn byte_size(&self) -> usize;
}

impl ByteSize for Vec<u8> {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl ByteSize for String {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

/// Called with every entry the store evicts, synchronously inside `add`.
pub type OnEvicted<V> = Box<dyn FnMut(&str, &V) + Send>;

struct Node<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

pub struct LruStore<V> {
    /// Capacity in bytes. `0` means unlimited.
    max_bytes: usize,
    used_bytes: usize,
    slots: Vec<Option<Node<V>>>,
    free_slots: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    index: HashMap<String, usize>,
    on_evicted: Option<OnEvicted<V>>,
}

impl<V: ByteSize> LruStore<V> {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            slots: Vec::new(),
            free_slots: Vec::new(),
            head: None,
            tail: None,
            index: HashMap::new(),
            on_evicted: None,
        }
    }

    /// Creates a store that reports every eviction to `on_evicted`.
    pub fn with_eviction<F>(max_bytes: usize, on_evicted: F) -> Self
    where
        F: FnMut(&str, &V) + Send + 'static,
    {
        let mut store = Self::new(max_bytes);
        store.on_evicted = Some(Box::new(on_evicted));
        store
    }

    /// Looks up `key` and marks it as most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        self.slots[idx].as_ref().map(|node| &node.value)
    }

    /// Inserts or replaces `key`, then evicts from the tail until the store is
    /// back within capacity.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        if let Some(&idx) = self.index.get(&key) {
            self.move_to_front(idx);
            if let Some(node) = self.slots[idx].as_mut() {
                let added = value.byte_size();
                let old = std::mem::replace(&mut node.value, value);
                self.used_bytes = self.used_bytes + added - old.byte_size();
            }
        } else {
            self.used_bytes += key.len() + value.byte_size();
            let idx = self.alloc(Node {
                key: key.clone(),
                value,
                prev: None,
                next: None,
            });
            self.push_front(idx);
            self.index.insert(key, idx);
        }

        while self.max_bytes != 0 && self.used_bytes > self.max_bytes {
            if self.remove_oldest().is_none() {
                break;
            }
        }
    }

    /// Evicts the least recently used entry and returns it.
    pub fn remove_oldest(&mut self) -> Option<(String, V)> {
        let idx = self.tail?;
        self.unlink(idx);
        let node = self.slots[idx].take()?;
        self.free_slots.push(idx);
        self.index.remove(&node.key);
        self.used_bytes -= node.key.len() + node.value.byte_size();

        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(&node.key, &node.value);
        }
        Some((node.key, node.value))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let Some(node) = self.slots[idx].as_ref() else {
                break;
            };
            keys.push(node.key.as_str());
            cursor = node.next;
        }
        keys
    }

    fn alloc(&mut self, node: Node<V>) -> usize {
        if let Some(idx) = self.free_slots.pop() {
            self.slots[idx] = Some(node);
            idx
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => {
                if let Some(node) = self.slots[h].as_mut() {
                    node.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_mut() {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.slots[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.slots[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_promotes_entry() {
        let mut store: LruStore<String> = LruStore::new(0);
        store.add("a", "1".to_string());
        store.add("b", "2".to_string());
        assert_eq!(store.keys(), vec!["b", "a"]);

        assert_eq!(store.get("a").map(String::as_str), Some("1"));
        assert_eq!(store.keys(), vec!["a", "b"]);
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_slots_are_recycled_after_eviction() {
        let mut store: LruStore<String> = LruStore::new(4);
        for i in 0..10 {
            store.add(format!("k{}", i), "v".to_string());
        }
        // "k9v" is 3 bytes, two entries never fit
        assert_eq!(store.len(), 1);
        assert_eq!(store.slots.len(), 2);
    }
}
