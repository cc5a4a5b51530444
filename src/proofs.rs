// Copyright 2023. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{io, marker::PhantomData};

use borsh::{BorshDeserialize, BorshSerialize};
use digest::{consts::U32, Digest};
use serde::{Deserialize, Serialize};

use crate::{
    bit_utils::{get_bit, set_bit, TraverseDirection},
    default_hashes::DefaultHashes,
    error::SMTError,
    node::{branch_hash, leaf_hash, NodeHash, NodeKey, EMPTY_LEAF_HASH, KEY_LENGTH, TREE_DEPTH},
    store::HashStore,
    tree::SparseMerkleTree,
};

/// A Merkle proof for one key: the ordered sequence of the 256 sibling hashes met on the descent from the root to
/// the key's leaf, nearest the root first.
///
/// The same proof shape serves as an inclusion proof (verify with the value held at the key) and an exclusion
/// proof (verify with no value, asserting the leaf is empty). Verification is a pure computation; it needs the
/// candidate root hash but no access to the tree's store.
///
/// ```
/// use sha2::Sha256;
/// use tari_smt::{NodeKey, SparseMerkleTree};
///
/// let mut tree = SparseMerkleTree::<Sha256>::default();
/// let key = NodeKey::from([64u8; 32]);
/// tree.upsert(&key, b"stored value").unwrap();
///
/// let proof = tree.prove(&key).unwrap();
/// assert!(proof.verify(tree.root(), &key, Some(b"stored value")));
/// // The same tree proves that another key holds nothing
/// let absent = NodeKey::from([65u8; 32]);
/// let proof = tree.prove(&absent).unwrap();
/// assert!(proof.verify(tree.root(), &absent, None));
/// ```
#[derive(Serialize, Deserialize)]
#[serde(try_from = "Vec<NodeHash>", into = "Vec<NodeHash>")]
pub struct MerkleProof<H> {
    siblings: Vec<NodeHash>,
    phantom: PhantomData<H>,
}

// Derived impls would put a spurious `H: Trait` bound on the hash parameter
impl<H> Clone for MerkleProof<H> {
    fn clone(&self) -> Self {
        Self {
            siblings: self.siblings.clone(),
            phantom: PhantomData,
        }
    }
}

impl<H> std::fmt::Debug for MerkleProof<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerkleProof").field("siblings", &self.siblings).finish()
    }
}

impl<H> PartialEq for MerkleProof<H> {
    fn eq(&self, other: &Self) -> bool {
        self.siblings == other.siblings
    }
}

impl<H> Eq for MerkleProof<H> {}

impl<H> MerkleProof<H> {
    /// Construct a proof from the given sibling hashes. There must be exactly one sibling per tree level.
    pub fn new(siblings: Vec<NodeHash>) -> Result<Self, SMTError> {
        if siblings.len() != TREE_DEPTH {
            return Err(SMTError::InvalidProofLength {
                actual: siblings.len(),
            });
        }
        Ok(Self {
            siblings,
            phantom: PhantomData,
        })
    }

    /// The sibling hashes along the path to the key's leaf, nearest the root first.
    pub fn siblings(&self) -> &[NodeHash] {
        &self.siblings
    }
}

impl<H> TryFrom<Vec<NodeHash>> for MerkleProof<H> {
    type Error = SMTError;

    fn try_from(siblings: Vec<NodeHash>) -> Result<Self, Self::Error> {
        Self::new(siblings)
    }
}

impl<H> From<MerkleProof<H>> for Vec<NodeHash> {
    fn from(proof: MerkleProof<H>) -> Self {
        proof.siblings
    }
}

impl<H> BorshSerialize for MerkleProof<H> {
    fn serialize<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        BorshSerialize::serialize(&self.siblings, writer)
    }
}

impl<H> BorshDeserialize for MerkleProof<H> {
    fn deserialize_reader<R: io::Read>(reader: &mut R) -> io::Result<Self> {
        let siblings = Vec::<NodeHash>::deserialize_reader(reader)?;
        Self::new(siblings).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
    }
}

impl<H: Digest<OutputSize = U32>> MerkleProof<H> {
    /// Generate the proof for the given key from the given tree. Sibling collection re-runs the same descent as a
    /// lookup, so this fails with `MissingNode` against an inconsistent store.
    pub fn from_tree<S: HashStore>(tree: &SparseMerkleTree<H, S>, key: &NodeKey) -> Result<Self, SMTError> {
        let siblings = tree.build_sibling_path(key)?;
        Self::new(siblings)
    }

    /// Check this proof against a root hash. `Some(value)` asserts that `key` holds exactly `value`; `None`
    /// asserts that `key` holds nothing.
    ///
    /// The root is recomputed bottom-up from the leaf hash, folding in one sibling per level using the direction
    /// bits of `key`. Any altered key bit, value byte, sibling entry or root hash changes the outcome.
    #[must_use = "Must use the result of the proof verification"]
    pub fn verify(&self, root: &NodeHash, key: &NodeKey, value: Option<&[u8]>) -> bool {
        let leaf = match value {
            Some(value) => leaf_hash::<H>(value),
            None => EMPTY_LEAF_HASH,
        };
        let calculated = self
            .siblings
            .iter()
            .zip(key.as_directions())
            .rev()
            .fold(leaf, |current, (sibling, direction)| match direction {
                TraverseDirection::Left => branch_hash::<H>(&current, sibling),
                TraverseDirection::Right => branch_hash::<H>(sibling, &current),
            });
        calculated == *root
    }

    /// Compress this proof by omitting every sibling that is the hash of an empty subtree. For each depth `i`,
    /// bit `i` of the bitmask is set when `siblings[i]` equals the default hash at depth `i + 1`; the remaining
    /// siblings are retained in increasing depth order.
    pub fn compress(&self, defaults: &DefaultHashes<H>) -> CompactMerkleProof<H> {
        let mut bitmask = [0u8; KEY_LENGTH];
        let mut retained = Vec::new();
        for (depth, sibling) in self.siblings.iter().enumerate() {
            if sibling == defaults.sibling_at(depth) {
                set_bit(&mut bitmask, depth);
            } else {
                retained.push(sibling.clone());
            }
        }
        CompactMerkleProof {
            bitmask,
            siblings: retained,
            phantom: PhantomData,
        }
    }
}

/// A [`MerkleProof`] with its default siblings elided.
///
/// The wire shape is a 32-byte bitmask followed by the retained sibling hashes. Bit `i` of the bitmask (most
/// significant bit of byte 0 first, matching the key path order) says that the sibling at depth `i` is the
/// default hash for that depth and was omitted. The retained list holds the remaining siblings in increasing
/// depth order, and decompression consumes it front to back in that same order. Most paths in a sparsely
/// populated tree run through empty subtrees, so typically nearly all bits are set and only a handful of hashes
/// travel with the proof.
#[derive(Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct CompactMerkleProof<H> {
    #[serde(with = "crate::serde_support::hash_hex")]
    bitmask: [u8; KEY_LENGTH],
    siblings: Vec<NodeHash>,
    phantom: PhantomData<H>,
}

impl<H> Clone for CompactMerkleProof<H> {
    fn clone(&self) -> Self {
        Self {
            bitmask: self.bitmask,
            siblings: self.siblings.clone(),
            phantom: PhantomData,
        }
    }
}

impl<H> std::fmt::Debug for CompactMerkleProof<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompactMerkleProof")
            .field("bitmask", &hex::encode(self.bitmask))
            .field("siblings", &self.siblings)
            .finish()
    }
}

impl<H> PartialEq for CompactMerkleProof<H> {
    fn eq(&self, other: &Self) -> bool {
        self.bitmask == other.bitmask && self.siblings == other.siblings
    }
}

impl<H> Eq for CompactMerkleProof<H> {}

impl<H> CompactMerkleProof<H> {
    /// One bit per tree level; a set bit marks an elided default sibling.
    pub fn bitmask(&self) -> &[u8; KEY_LENGTH] {
        &self.bitmask
    }

    /// The retained non-default siblings, in increasing depth order.
    pub fn siblings(&self) -> &[NodeHash] {
        &self.siblings
    }
}

impl<H: Digest<OutputSize = U32>> CompactMerkleProof<H> {
    /// Expand back to a full 256-entry proof, substituting the default hash at every depth whose bit is set.
    ///
    /// Fails with `InvalidCompactProof` when the retained list runs out before every unset bit is satisfied, or
    /// when entries are left over afterwards; either means the proof was malformed or tampered with.
    pub fn decompress(&self, defaults: &DefaultHashes<H>) -> Result<MerkleProof<H>, SMTError> {
        let mut retained = self.siblings.iter();
        let mut siblings = Vec::with_capacity(TREE_DEPTH);
        for depth in 0..TREE_DEPTH {
            if get_bit(&self.bitmask, depth) == 1 {
                siblings.push(defaults.sibling_at(depth).clone());
            } else {
                let sibling = retained.next().ok_or(SMTError::InvalidCompactProof)?;
                siblings.push(sibling.clone());
            }
        }
        if retained.next().is_some() {
            return Err(SMTError::InvalidCompactProof);
        }
        MerkleProof::new(siblings)
    }

    /// Decompress and verify in one step. See [`MerkleProof::verify`].
    pub fn verify(
        &self,
        root: &NodeHash,
        key: &NodeKey,
        value: Option<&[u8]>,
        defaults: &DefaultHashes<H>,
    ) -> Result<bool, SMTError> {
        let proof = self.decompress(defaults)?;
        Ok(proof.verify(root, key, value))
    }
}
