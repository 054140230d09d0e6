//! Point operations and cursors scoped to a registered partition.

use crate::cursor::Cursor;
use crate::error::{CoreError, CoreResult};
use crate::partition::{PartitionId, PartitionRegistry};
use partikv_engine::EngineStore;
use tracing::trace;

/// An open engine store together with its partition registry.
///
/// Every call resolves the partition ID first, so an unregistered ID
/// fails with `UnknownPartition` before the engine is touched.
pub struct RecordStore<S: EngineStore> {
    store: S,
    registry: PartitionRegistry<S::Partition>,
}

impl<S: EngineStore> RecordStore<S> {
    /// Wraps a bootstrapped store.
    pub fn new(store: S, registry: PartitionRegistry<S::Partition>) -> Self {
        Self { store, registry }
    }

    /// The partition registry.
    #[must_use]
    pub fn registry(&self) -> &PartitionRegistry<S::Partition> {
        &self.registry
    }

    /// The underlying engine store.
    #[must_use]
    pub fn engine_store(&self) -> &S {
        &self.store
    }

    /// Inserts or replaces the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition is unknown, the key is empty, or
    /// the engine fails.
    pub fn put(&self, partition: PartitionId, key: &[u8], value: &[u8]) -> CoreResult<()> {
        let handle = self.resolve(partition, key)?;
        trace!(%partition, key_len = key.len(), value_len = value.len(), "put");
        self.store.put(handle, key, value)?;
        Ok(())
    }

    /// Returns a copy of the value under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition is unknown, the key is empty, or
    /// the engine fails.
    pub fn get(&self, partition: PartitionId, key: &[u8]) -> CoreResult<Option<Vec<u8>>> {
        let handle = self.resolve(partition, key)?;
        trace!(%partition, key_len = key.len(), "get");
        Ok(self.store.get(handle, key)?)
    }

    /// Removes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition is unknown, the key is empty, or
    /// the engine fails.
    pub fn delete(&self, partition: PartitionId, key: &[u8]) -> CoreResult<()> {
        let handle = self.resolve(partition, key)?;
        trace!(%partition, key_len = key.len(), "delete");
        self.store.delete(handle, key)?;
        Ok(())
    }

    /// Returns true if `key` is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition is unknown, the key is empty, or
    /// the engine fails.
    pub fn exists(&self, partition: PartitionId, key: &[u8]) -> CoreResult<bool> {
        let handle = self.resolve(partition, key)?;
        trace!(%partition, key_len = key.len(), "exists");
        Ok(self.store.contains(handle, key)?)
    }

    /// Opens a cursor at the first key greater than or equal to `start`.
    /// An empty `start` positions at the first key of the partition.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition is unknown or the engine fails.
    pub fn seek(&self, partition: PartitionId, start: &[u8]) -> CoreResult<Cursor<S::Iter>> {
        let handle = self.registry.resolve(partition)?;
        trace!(%partition, key_len = start.len(), "seek");
        Cursor::open(self.store.iter(handle)?, partition, start, None)
    }

    /// Opens a cursor over the keys starting with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition is unknown or the engine fails.
    pub fn seek_prefix(
        &self,
        partition: PartitionId,
        prefix: &[u8],
    ) -> CoreResult<Cursor<S::Iter>> {
        let handle = self.registry.resolve(partition)?;
        trace!(%partition, prefix_len = prefix.len(), "seek_prefix");
        Cursor::open(
            self.store.iter(handle)?,
            partition,
            prefix,
            Some(prefix.to_vec()),
        )
    }

    fn resolve(&self, partition: PartitionId, key: &[u8]) -> CoreResult<&S::Partition> {
        let handle = self.registry.resolve(partition)?;
        if key.is_empty() {
            return Err(CoreError::EmptyKey);
        }
        Ok(handle)
    }
}
