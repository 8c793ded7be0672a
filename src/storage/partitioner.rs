//! Consistent Hash Ring
//!
//! Assigns keys to peers. Every real node is placed on the ring `replicas`
//! times (virtual nodes) so that a small peer set still gets an even share of
//! the key space, and adding a node only moves the keys that land on its new
//! virtual positions.

use std::collections::HashMap;

/// Maps bytes onto the ring.
pub type HashFn = fn(&[u8]) -> u32;

pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Virtual node hashes, kept sorted for binary search.
    keys: Vec<u32>,
    /// Virtual node hash -> real node.
    nodes: HashMap<u32, String>,
}

impl HashRing {
    /// Creates a ring using CRC-32 (IEEE), which every peer computes the same way.
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, crc32fast::hash)
    }

    pub fn with_hasher(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas,
            keys: Vec::new(),
            nodes: HashMap::new(),
        }
    }

    /// Places each node on the ring `replicas` times.
    ///
    /// Adding a node that is already present duplicates its virtual entries.
    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            for i in 0..self.replicas {
                let hash = (self.hash)(format!("{}{}", i, node).as_bytes());
                self.keys.push(hash);
                self.nodes.insert(hash, node.to_string());
            }
        }
        self.keys.sort_unstable();
    }

    /// Returns the node owning `key`: the first virtual node clockwise from the
    /// key's hash, wrapping around to the start of the ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.keys.partition_point(|&k| k < hash);
        let virtual_hash = self.keys[idx % self.keys.len()];

        self.nodes.get(&virtual_hash).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
