// Copyright 2023. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use thiserror::Error;

use crate::node::NodeHash;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SMTError {
    #[error("The key must be exactly 32 bytes, but {actual} bytes were given")]
    InvalidKeyLength { actual: usize },
    #[error("The node {hash} could not be resolved in the hash store")]
    MissingNode { hash: NodeHash },
    #[error("A Merkle proof must hold exactly 256 sibling hashes, but {actual} were given")]
    InvalidProofLength { actual: usize },
    #[error("The compact proof's sibling list does not match its bitmask")]
    InvalidCompactProof,
}
