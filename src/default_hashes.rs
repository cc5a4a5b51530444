// Copyright 2023. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::marker::PhantomData;

use digest::{consts::U32, Digest};

use crate::{
    node::{branch_hash, encode_branch, NodeHash, EMPTY_LEAF_HASH, TREE_DEPTH},
    store::HashStore,
};

/// The precomputed hashes of empty subtrees, one per tree depth.
///
/// `hash_at(TREE_DEPTH)` is the empty leaf sentinel; for every depth above it, the default hash is the hash of a
/// branch whose children are both the default hash one level down. `hash_at(0)` is therefore the root of a tree
/// holding no values at all. The table is immutable after construction and identical for every tree driven by the
/// same hash function.
pub struct DefaultHashes<H> {
    hashes: Vec<NodeHash>,
    phantom: PhantomData<H>,
}

impl<H: Digest<OutputSize = U32>> DefaultHashes<H> {
    /// Compute the full table, from the empty leaf sentinel up to the empty root.
    pub fn new() -> Self {
        let mut hashes = vec![EMPTY_LEAF_HASH; TREE_DEPTH + 1];
        for depth in (0..TREE_DEPTH).rev() {
            hashes[depth] = branch_hash::<H>(&hashes[depth + 1], &hashes[depth + 1]);
        }
        Self {
            hashes,
            phantom: PhantomData,
        }
    }

    /// Write every default branch node into the store, so that a freshly constructed empty tree can be traversed
    /// to any depth without special-casing unoccupied paths.
    pub fn persist_to<S: HashStore>(&self, store: &mut S) {
        for depth in 0..TREE_DEPTH {
            let child = &self.hashes[depth + 1];
            store.set(self.hashes[depth].clone(), encode_branch(child, child));
        }
    }

    /// The hash of an empty subtree whose root sits at the given depth. Depth 0 is the tree root, depth
    /// `TREE_DEPTH` the leaf level.
    pub fn hash_at(&self, depth: usize) -> &NodeHash {
        &self.hashes[depth]
    }

    /// The root hash of a tree containing no values.
    pub fn empty_root(&self) -> &NodeHash {
        &self.hashes[0]
    }

    /// The default sibling seen at the given depth of a descent: the hash of the empty subtree hanging one level
    /// below it.
    pub fn sibling_at(&self, depth: usize) -> &NodeHash {
        &self.hashes[depth + 1]
    }
}

impl<H: Digest<OutputSize = U32>> Default for DefaultHashes<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use sha2::Sha256;

    use super::*;
    use crate::{node::decode_branch, store::MemoryHashStore};

    #[test]
    fn table_shape() {
        let defaults = DefaultHashes::<Sha256>::new();
        assert_eq!(defaults.hash_at(TREE_DEPTH), &EMPTY_LEAF_HASH);
        // Independently recompute the empty root from the sentinel upwards
        let mut h = EMPTY_LEAF_HASH;
        for _ in 0..TREE_DEPTH {
            h = branch_hash::<Sha256>(&h, &h);
        }
        assert_eq!(defaults.empty_root(), &h);
        // No two depths share a hash
        for depth in 0..TREE_DEPTH {
            assert_ne!(defaults.hash_at(depth), defaults.hash_at(depth + 1));
            assert_eq!(defaults.sibling_at(depth), defaults.hash_at(depth + 1));
        }
    }

    #[test]
    fn persisted_table_is_dereferenceable() {
        let defaults = DefaultHashes::<Sha256>::new();
        let mut store = MemoryHashStore::new();
        defaults.persist_to(&mut store);
        assert_eq!(store.len(), TREE_DEPTH);
        // Every stored branch body points at the default hash one level down
        for depth in 0..TREE_DEPTH {
            let body = store.get(defaults.hash_at(depth)).unwrap();
            let (left, right) = decode_branch(&body).unwrap();
            assert_eq!(&left, defaults.hash_at(depth + 1));
            assert_eq!(&right, defaults.hash_at(depth + 1));
        }
    }
}
