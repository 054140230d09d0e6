//! Reference-model checks.
//!
//! [`ModelHarness`] applies every operation to both a database and a
//! `BTreeMap` per partition, and asserts that the two agree.

use crate::generators::Operation;
use partikv_core::{Database, Engine, PartitionId};
use std::collections::BTreeMap;

type Model = BTreeMap<Vec<u8>, Vec<u8>>;

/// A database paired with the records it is expected to hold.
pub struct ModelHarness<'a, E: Engine> {
    db: &'a Database<E>,
    models: Vec<Model>,
}

impl<'a, E: Engine> ModelHarness<'a, E> {
    /// Tracks `db`, which must start empty.
    pub fn new(db: &'a Database<E>) -> Self {
        Self {
            db,
            models: vec![Model::new(); db.partitions().len()],
        }
    }

    /// Applies one operation and checks its outcome.
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::Put {
                partition,
                key,
                value,
            } => self.put(PartitionId::new(*partition), key, value),
            Operation::Delete { partition, key } => self.delete(PartitionId::new(*partition), key),
            Operation::Get { partition, key } => {
                self.get_and_verify(PartitionId::new(*partition), key);
            }
        }
    }

    /// Puts a record and tracks it.
    pub fn put(&mut self, partition: PartitionId, key: &[u8], value: &[u8]) {
        self.db.put(partition, key, value).expect("Failed to put record");
        self.model(partition).insert(key.to_vec(), value.to_vec());
    }

    /// Deletes a record and tracks it.
    pub fn delete(&mut self, partition: PartitionId, key: &[u8]) {
        self.db.delete(partition, key).expect("Failed to delete record");
        self.model(partition).remove(key);
    }

    /// Reads a record and asserts it matches the model.
    pub fn get_and_verify(&self, partition: PartitionId, key: &[u8]) -> Option<Vec<u8>> {
        let actual = self.db.get(partition, key).expect("Failed to get record");
        let expected = self.models[partition.as_u32() as usize].get(key);
        assert_eq!(actual.as_ref(), expected, "record mismatch for {key:?} in {partition}");
        assert_eq!(
            self.db.exists(partition, key).expect("Failed to check record"),
            expected.is_some()
        );
        actual
    }

    /// Asserts that a full cursor scan of every partition equals the model.
    pub fn verify_all(&self) {
        for (i, model) in self.models.iter().enumerate() {
            let partition = PartitionId::new(i as u32);
            let scanned: Vec<(Vec<u8>, Vec<u8>)> = self
                .db
                .seek(partition, b"")
                .expect("Failed to open cursor")
                .into_entries()
                .collect::<Result<_, _>>()
                .expect("Failed to scan");
            let expected: Vec<(Vec<u8>, Vec<u8>)> =
                model.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            assert_eq!(scanned, expected, "scan mismatch in {partition}");
        }
    }

    /// Asserts that a scan from `start` equals the model's range.
    pub fn verify_seek(&self, partition: PartitionId, start: &[u8]) {
        let scanned: Vec<Vec<u8>> = self
            .db
            .seek(partition, start)
            .expect("Failed to open cursor")
            .into_entries()
            .map(|e| e.expect("Failed to scan").0)
            .collect();
        let expected: Vec<Vec<u8>> = self.models[partition.as_u32() as usize]
            .range(start.to_vec()..)
            .map(|(k, _)| k.clone())
            .collect();
        assert_eq!(scanned, expected, "seek mismatch from {start:?} in {partition}");
    }

    /// Number of records tracked across all partitions.
    pub fn tracked_count(&self) -> usize {
        self.models.iter().map(BTreeMap::len).sum()
    }

    fn model(&mut self, partition: PartitionId) -> &mut Model {
        &mut self.models[partition.as_u32() as usize]
    }
}
