// Copyright 2023. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{convert::TryFrom, fmt};

use borsh::{BorshDeserialize, BorshSerialize};
use digest::{consts::U32, Digest};
use serde::{Deserialize, Serialize};

use crate::{
    bit_utils::{bit_to_dir, TraverseDirection},
    error::SMTError,
};

/// The number of bytes in a key or hash. The tree is built over a key space of `8 * KEY_LENGTH` bits.
pub const KEY_LENGTH: usize = 32;
/// The number of levels in the tree. Every leaf sits at this depth.
pub const TREE_DEPTH: usize = KEY_LENGTH * 8;

/// The hash of an empty leaf position. The all-zero digest is reserved as a sentinel; this relies on the hash
/// function never producing the all-zero value, which holds with overwhelming probability for any 256-bit
/// collision-resistant hash.
pub const EMPTY_LEAF_HASH: NodeHash = NodeHash([0; KEY_LENGTH]);

macro_rules! hash_type {
    ($name: ident) => {
        /// A wrapper around a 32-byte array.
        #[derive(
            Clone,
            Debug,
            Default,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
            BorshSerialize,
            BorshDeserialize,
        )]
        pub struct $name(#[serde(with = "crate::serde_support::hash_hex")] [u8; KEY_LENGTH]);

        impl $name {
            pub fn as_slice(&self) -> &[u8] {
                &self.0
            }

            pub fn as_slice_mut(&mut self) -> &mut [u8] {
                &mut self.0
            }

            pub const fn len(&self) -> usize {
                KEY_LENGTH
            }

            pub const fn is_empty(&self) -> bool {
                false
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl From<[u8; KEY_LENGTH]> for $name {
            fn from(arr: [u8; KEY_LENGTH]) -> Self {
                Self(arr)
            }
        }

        impl From<&[u8; KEY_LENGTH]> for $name {
            fn from(arr: &[u8; KEY_LENGTH]) -> Self {
                Self(*arr)
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = SMTError;

            fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
                let arr = <[u8; KEY_LENGTH]>::try_from(slice).map_err(|_| SMTError::InvalidKeyLength {
                    actual: slice.len(),
                })?;
                Ok(Self(arr))
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }
    };
}

hash_type!(NodeKey);
hash_type!(NodeHash);

impl NodeKey {
    /// Iterate over the 256 traversal directions encoded in this key, most significant bit first.
    pub fn as_directions(&self) -> PathIterator {
        PathIterator::new(self)
    }
}

pub struct PathIterator<'a> {
    front: usize,
    back: usize,
    key: &'a NodeKey,
}

impl<'a> PathIterator<'a> {
    pub(crate) fn new(key: &'a NodeKey) -> Self {
        PathIterator {
            front: 0,
            back: TREE_DEPTH,
            key,
        }
    }
}

impl<'a> Iterator for PathIterator<'a> {
    type Item = TraverseDirection;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let bit = crate::bit_utils::get_bit(self.key.as_slice(), self.front);
        self.front += 1;
        Some(bit_to_dir(bit))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for PathIterator<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        let bit = crate::bit_utils::get_bit(self.key.as_slice(), self.back);
        Some(bit_to_dir(bit))
    }
}

impl ExactSizeIterator for PathIterator<'_> {}

/// The canonical encoding of a branch node: the left child hash followed by the right child hash.
pub(crate) fn encode_branch(left: &NodeHash, right: &NodeHash) -> Vec<u8> {
    let mut body = Vec::with_capacity(2 * KEY_LENGTH);
    body.extend_from_slice(left.as_slice());
    body.extend_from_slice(right.as_slice());
    body
}

/// Splits a stored 64-byte branch body into its left and right child hashes. Returns `None` if the body is not
/// exactly 64 bytes, which indicates a corrupt store entry.
pub(crate) fn decode_branch(body: &[u8]) -> Option<(NodeHash, NodeHash)> {
    if body.len() != 2 * KEY_LENGTH {
        return None;
    }
    let left = NodeHash::try_from(&body[..KEY_LENGTH]).ok()?;
    let right = NodeHash::try_from(&body[KEY_LENGTH..]).ok()?;
    Some((left, right))
}

/// The hash that addresses a branch node in the store, `H(left ‖ right)`.
pub(crate) fn branch_hash<H: Digest<OutputSize = U32>>(left: &NodeHash, right: &NodeHash) -> NodeHash {
    let hash = H::new().chain_update(left.as_slice()).chain_update(right.as_slice()).finalize();
    let mut result = [0; KEY_LENGTH];
    result.copy_from_slice(hash.as_slice());
    result.into()
}

/// The hash that addresses a leaf value in the store, `H(value)`.
pub(crate) fn leaf_hash<H: Digest<OutputSize = U32>>(value: &[u8]) -> NodeHash {
    let hash = H::digest(value);
    let mut result = [0; KEY_LENGTH];
    result.copy_from_slice(hash.as_slice());
    result.into()
}

#[cfg(test)]
mod test {
    use sha2::Sha256;

    use super::*;

    #[test]
    fn key_from_slice() {
        let key = NodeKey::try_from([1u8; 32].as_slice()).unwrap();
        assert_eq!(key, NodeKey::from([1u8; 32]));
        let err = NodeKey::try_from([1u8; 31].as_slice()).unwrap_err();
        assert_eq!(err, SMTError::InvalidKeyLength { actual: 31 });
        let err = NodeKey::try_from([1u8; 33].as_slice()).unwrap_err();
        assert_eq!(err, SMTError::InvalidKeyLength { actual: 33 });
    }

    #[test]
    fn directions() {
        let mut key = [0u8; 32];
        key[0] = 0b1010_0000;
        let key = NodeKey::from(key);
        let dirs = key.as_directions().collect::<Vec<_>>();
        assert_eq!(dirs.len(), TREE_DEPTH);
        assert_eq!(dirs[0], TraverseDirection::Right);
        assert_eq!(dirs[1], TraverseDirection::Left);
        assert_eq!(dirs[2], TraverseDirection::Right);
        assert!(dirs[3..].iter().all(|d| *d == TraverseDirection::Left));
        // The reverse walk used during proof verification visits the same bits
        let mut reversed = key.as_directions().rev().collect::<Vec<_>>();
        reversed.reverse();
        assert_eq!(reversed, dirs);
    }

    #[test]
    fn branch_encoding_round_trip() {
        let left = NodeHash::from([1u8; 32]);
        let right = NodeHash::from([2u8; 32]);
        let body = encode_branch(&left, &right);
        assert_eq!(body.len(), 64);
        let (l, r) = decode_branch(&body).unwrap();
        assert_eq!(l, left);
        assert_eq!(r, right);
        assert!(decode_branch(&body[..63]).is_none());
    }

    #[test]
    fn branch_hash_matches_digest_of_body() {
        let left = NodeHash::from([1u8; 32]);
        let right = NodeHash::from([2u8; 32]);
        let body = encode_branch(&left, &right);
        let expected = leaf_hash::<Sha256>(&body);
        assert_eq!(branch_hash::<Sha256>(&left, &right), expected);
    }

    #[test]
    fn hex_display() {
        let hash = NodeHash::from([0xabu8; 32]);
        assert_eq!(hash.to_string(), "ab".repeat(32));
    }
}
