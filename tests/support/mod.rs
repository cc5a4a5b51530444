// Copyright 2023. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use sha2::Sha256;
use tari_smt::{MemoryHashStore, NodeKey, SparseMerkleTree};

pub type TestTree = SparseMerkleTree<Sha256, MemoryHashStore>;

pub fn random_key() -> NodeKey {
    NodeKey::from(rand::random::<[u8; 32]>())
}

pub fn random_value() -> Vec<u8> {
    let len = 1 + rand::random::<usize>() % 64;
    (0..len).map(|_| rand::random::<u8>()).collect()
}

pub fn key_from_first_byte(v: u8) -> NodeKey {
    let mut key = [0u8; 32];
    key[0] = v;
    NodeKey::from(key)
}
