//! Benchmark utilities for PartiKV.

#![warn(missing_docs)]

use partikv_core::{Database, Engine, PartitionId};
use rand::Rng;

/// Generate random data of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Big-endian key for record `i`, so numeric and byte order agree.
pub fn seq_key(i: u64) -> [u8; 8] {
    i.to_be_bytes()
}

/// Generate `count` random keys of `len` bytes.
pub fn random_keys(count: usize, len: usize) -> Vec<Vec<u8>> {
    (0..count).map(|_| random_data(len.max(1))).collect()
}

/// Writes `count` sequential records with `payload_size` byte values.
pub fn fill<E: Engine>(db: &Database<E>, partition: PartitionId, count: u64, payload_size: usize) {
    let value = random_data(payload_size);
    for i in 0..count {
        db.put(partition, &seq_key(i), &value).unwrap();
    }
}
