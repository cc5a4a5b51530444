// Copyright 2023. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! # Sparse Merkle trees
//!
//! An authenticated dictionary over a fixed 256-bit key space. Every key is a 32-byte path from the root to a
//! leaf; a leaf either holds a value or the all-zero empty sentinel. The hash of the whole structure is a single
//! 32-byte root that commits to every binding in the tree, and succinct proofs of both inclusion *and* exclusion
//! can be checked against that root without any access to the tree itself.
//!
//! Only occupied paths are ever materialised. Subtrees holding no values are represented by a table of
//! precomputed per-depth default hashes, so the cost of every operation is bounded by the tree depth. All
//! materialised nodes are written to a content-addressed [`HashStore`], which makes node writes idempotent and
//! keeps the nodes of superseded roots dereferenceable for as long as the store retains them.
//!
//! The tree is generic over the hash function, which must produce 32-byte digests; SHA-256 is the reference
//! instantiation. The all-zero digest is reserved as the empty-leaf sentinel, which assumes the chosen hash never
//! produces it. That holds with overwhelming probability for any collision-resistant 256-bit hash.
//!
//! # Example
//!
//! ```rust
//! use sha2::Sha256;
//! use tari_smt::{MemoryHashStore, NodeKey, SparseMerkleTree};
//!
//! fn new_key(v: u8) -> NodeKey {
//!     let mut key = [0u8; 32];
//!     key[31] = v;
//!     NodeKey::from(key)
//! }
//!
//! let mut tree = SparseMerkleTree::<Sha256>::new(MemoryHashStore::new());
//! let empty_root = tree.root().clone();
//!
//! tree.upsert(&new_key(4), &[0xff]).unwrap();
//! tree.upsert(&new_key(9), b"anything goes").unwrap();
//! assert_eq!(tree.get(&new_key(4)).unwrap(), Some(vec![0xff]));
//! assert_eq!(tree.get(&new_key(2)).unwrap(), None);
//!
//! // A proof for a key carries one sibling hash per tree level and verifies without the tree
//! let proof = tree.prove(&new_key(4)).unwrap();
//! assert!(proof.verify(tree.root(), &new_key(4), Some(&[0xff])));
//!
//! // Deleting every key returns the tree to its well-known empty root
//! tree.delete(&new_key(4)).unwrap();
//! tree.delete(&new_key(9)).unwrap();
//! assert!(tree.is_empty());
//! assert_eq!(tree.root(), &empty_root);
//! ```

mod bit_utils;
mod default_hashes;
mod error;
mod node;
mod proofs;
pub mod serde_support;
mod store;
mod tree;

pub use bit_utils::TraverseDirection;
pub use default_hashes::DefaultHashes;
pub use error::SMTError;
pub use node::{NodeHash, NodeKey, PathIterator, EMPTY_LEAF_HASH, KEY_LENGTH, TREE_DEPTH};
pub use proofs::{CompactMerkleProof, MerkleProof};
pub use store::{HashStore, MemoryHashStore};
pub use tree::SparseMerkleTree;
