// Copyright 2023. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use digest::{consts::U32, Digest};

use crate::{
    bit_utils::TraverseDirection,
    default_hashes::DefaultHashes,
    error::SMTError,
    node::{branch_hash, decode_branch, encode_branch, leaf_hash, NodeHash, NodeKey, EMPTY_LEAF_HASH, TREE_DEPTH},
    proofs::MerkleProof,
    store::{HashStore, MemoryHashStore},
};

/// A sparse Merkle tree over the full 256-bit key space.
///
/// Every key addresses a leaf at depth 256; unoccupied subtrees are represented by the precomputed
/// [`DefaultHashes`] table, so the cost of any operation is proportional to the tree depth, not to the key space.
/// All materialised nodes live in the backing [`HashStore`], addressed by the hash of their content. Because
/// nodes are content-addressed, an update never destroys the nodes of previous versions of the tree: any root
/// hash the caller has held onto remains dereferenceable for as long as the store keeps its entries.
///
/// The tree is a single-writer structure. `upsert` and `delete` must not be called concurrently with each other
/// or with reads against the same instance; readers holding old roots may run in parallel against the store
/// itself.
pub struct SparseMerkleTree<H, S = MemoryHashStore> {
    store: S,
    defaults: DefaultHashes<H>,
    root: NodeHash,
}

impl<H: Digest<OutputSize = U32>, S: HashStore> SparseMerkleTree<H, S> {
    /// Create an empty tree on top of the given store. The default-subtree table is computed once here and its
    /// branch nodes written into the store, so the empty tree is immediately traversable to any depth.
    pub fn new(mut store: S) -> Self {
        let defaults = DefaultHashes::<H>::new();
        defaults.persist_to(&mut store);
        let root = defaults.empty_root().clone();
        Self { store, defaults, root }
    }

    /// The root hash summarising the current contents of the tree.
    pub fn root(&self) -> &NodeHash {
        &self.root
    }

    /// Returns true if the tree holds no values at all.
    pub fn is_empty(&self) -> bool {
        &self.root == self.defaults.empty_root()
    }

    /// The default-subtree hash table this tree was built with.
    pub fn default_hashes(&self) -> &DefaultHashes<H> {
        &self.defaults
    }

    /// Insert a value at the given key, or overwrite the value already there.
    pub fn upsert(&mut self, key: &NodeKey, value: &[u8]) -> Result<(), SMTError> {
        self.put(key, Some(value))
    }

    /// Remove the value at the given key. Deleting a key that holds no value is a no-op that leaves the root
    /// unchanged.
    pub fn delete(&mut self, key: &NodeKey) -> Result<(), SMTError> {
        self.put(key, None)
    }

    /// Insert, overwrite or remove the value at the given key. `None` removes.
    ///
    /// The descent is completed, and every store read validated, before any node is written; the root pointer is
    /// only swapped once the whole unwind has succeeded, so a failed call leaves the tree exactly as it was.
    pub fn put(&mut self, key: &NodeKey, value: Option<&[u8]>) -> Result<(), SMTError> {
        let mut siblings = self.descend(key)?;
        let mut current = match value {
            Some(value) => {
                let leaf = leaf_hash::<H>(value);
                self.store.set(leaf.clone(), value.to_vec());
                leaf
            },
            None => EMPTY_LEAF_HASH,
        };
        while let Some((direction, sibling)) = siblings.pop() {
            let (left, right) = match direction {
                TraverseDirection::Left => (current, sibling),
                TraverseDirection::Right => (sibling, current),
            };
            let parent = branch_hash::<H>(&left, &right);
            self.store.set(parent.clone(), encode_branch(&left, &right));
            current = parent;
        }
        self.root = current;
        Ok(())
    }

    /// Fetch the value stored at the given key, or `None` if the key holds no value.
    pub fn get(&self, key: &NodeKey) -> Result<Option<Vec<u8>>, SMTError> {
        let mut current = self.root.clone();
        for direction in key.as_directions() {
            let (left, right) = self.load_branch(&current)?;
            current = match direction {
                TraverseDirection::Left => left,
                TraverseDirection::Right => right,
            };
        }
        if current == EMPTY_LEAF_HASH {
            return Ok(None);
        }
        // Any non-sentinel leaf hash was written by a prior put, so a miss here is a store inconsistency, not an
        // absent key.
        let value = self.store.get(&current).ok_or(SMTError::MissingNode { hash: current })?;
        Ok(Some(value))
    }

    /// Build a Merkle proof for the given key. The proof covers both membership (the key holds a value) and
    /// non-membership (it does not); which of the two it attests to is decided at verification time.
    pub fn prove(&self, key: &NodeKey) -> Result<MerkleProof<H>, SMTError> {
        MerkleProof::from_tree(self, key)
    }

    pub(crate) fn build_sibling_path(&self, key: &NodeKey) -> Result<Vec<NodeHash>, SMTError> {
        let siblings = self.descend(key)?;
        Ok(siblings.into_iter().map(|(_, sibling)| sibling).collect())
    }

    /// Walk from the root to the leaf addressed by `key`, recording the off-path sibling at every level.
    fn descend(&self, key: &NodeKey) -> Result<Vec<(TraverseDirection, NodeHash)>, SMTError> {
        let mut current = self.root.clone();
        let mut siblings = Vec::with_capacity(TREE_DEPTH);
        for direction in key.as_directions() {
            let (left, right) = self.load_branch(&current)?;
            current = match direction {
                TraverseDirection::Left => {
                    siblings.push((direction, right));
                    left
                },
                TraverseDirection::Right => {
                    siblings.push((direction, left));
                    right
                },
            };
        }
        Ok(siblings)
    }

    fn load_branch(&self, hash: &NodeHash) -> Result<(NodeHash, NodeHash), SMTError> {
        let body = self.store.get(hash).ok_or_else(|| SMTError::MissingNode { hash: hash.clone() })?;
        // A branch body that is not 64 bytes means the store resolved the hash to something that is not a node,
        // which is the same inconsistency as not resolving it at all.
        decode_branch(&body).ok_or_else(|| SMTError::MissingNode { hash: hash.clone() })
    }
}

impl<H: Digest<OutputSize = U32>, S: HashStore + Default> Default for SparseMerkleTree<H, S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
