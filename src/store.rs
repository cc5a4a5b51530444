// Copyright 2023. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::collections::HashMap;

use crate::node::NodeHash;

/// A content-addressed key-value store. Every entry is addressed by the hash of its content, so a store is
/// effectively append-only: the same key is only ever associated with one byte string, and writing an entry twice
/// is idempotent.
///
/// The tree does not require any transactional guarantees from the store beyond "a successful `set` makes the
/// entry visible to subsequent `get` calls on the same store instance". Implementations may be backed by memory,
/// disk, or anything else that honours that contract.
pub trait HashStore {
    /// Return the content stored under the given digest, or `None` if the digest is unknown to this store.
    fn get(&self, hash: &NodeHash) -> Option<Vec<u8>>;

    /// Store `content` under `hash`. The caller guarantees that `hash` is the digest of `content`.
    fn set(&mut self, hash: NodeHash, content: Vec<u8>);
}

/// The reference [`HashStore`] implementation, backed by an in-memory hash map.
#[derive(Debug, Clone, Default)]
pub struct MemoryHashStore {
    entries: HashMap<NodeHash, Vec<u8>>,
}

impl MemoryHashStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of distinct entries held by the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HashStore for MemoryHashStore {
    fn get(&self, hash: &NodeHash) -> Option<Vec<u8>> {
        self.entries.get(hash).cloned()
    }

    fn set(&mut self, hash: NodeHash, content: Vec<u8>) {
        self.entries.insert(hash, content);
    }
}

impl<S: HashStore> HashStore for &mut S {
    fn get(&self, hash: &NodeHash) -> Option<Vec<u8>> {
        (**self).get(hash)
    }

    fn set(&mut self, hash: NodeHash, content: Vec<u8>) {
        (**self).set(hash, content)
    }
}
