// Copyright 2023. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use sha2::Sha256;
use tari_smt::{MemoryHashStore, NodeKey, SparseMerkleTree};

fn random_key() -> NodeKey {
    let key = rand::random::<[u8; 32]>();
    NodeKey::from(key)
}

fn get_keys(n: usize) -> Vec<NodeKey> {
    (0..n).map(|_| random_key()).collect()
}

fn create_smt() -> SparseMerkleTree<Sha256, MemoryHashStore> {
    SparseMerkleTree::<Sha256>::new(MemoryHashStore::new())
}

pub fn benchmark_smt_upsert(c: &mut Criterion) {
    let sizes = [100, 1_000];
    for size in sizes {
        c.bench_function(&format!("SMT: Upsert {size} keys"), move |b| {
            let keys = get_keys(size);
            b.iter_batched(
                || (keys.clone(), create_smt()),
                |(keys, mut smt)| {
                    keys.iter().for_each(|key| {
                        smt.upsert(key, key.as_slice()).unwrap();
                    });
                },
                BatchSize::SmallInput,
            );
        });
    }
}

pub fn benchmark_smt_prove(c: &mut Criterion) {
    let keys = get_keys(1_000);
    let mut smt = create_smt();
    keys.iter().for_each(|key| {
        smt.upsert(key, key.as_slice()).unwrap();
    });
    c.bench_function("SMT: Generate and verify 100 proofs", |b| {
        let root = smt.root().clone();
        b.iter(|| {
            keys.iter().take(100).for_each(|key| {
                let proof = smt.prove(key).unwrap();
                assert!(proof.verify(&root, key, Some(key.as_slice())));
            });
        });
    });
}

criterion_group!(smt, benchmark_smt_upsert, benchmark_smt_prove);
criterion_main!(smt);
