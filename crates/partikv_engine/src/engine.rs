//! Engine boundary trait definitions.

use crate::error::EngineResult;
use std::fmt;
use std::path::Path;

/// Name of the partition every database carries.
///
/// It is created together with the database and always sits at index 0
/// of an opened partition list.
pub const DEFAULT_PARTITION: &str = "default";

/// An ordered key-value engine that can open and create databases.
///
/// Engines are **opaque sorted byte stores**. PartiKV owns partition naming
/// and bootstrap order; the engine owns on-disk format, compaction and
/// durability.
///
/// # Invariants
///
/// - `open` fails unless the database and *every* named partition exist
/// - `open` returns exactly one partition handle per requested name, in order
/// - `create` never fails just because the database already exists
///
/// # Implementors
///
/// - [`super::RedbEngine`] - For persistent storage
/// - [`super::MemoryEngine`] - For testing
pub trait Engine: Send + Sync {
    /// Handle to an open database.
    type Store: EngineStore;

    /// Opens the database at `path`, requiring each of `partitions`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No database exists at `path` (`MissingDatabase`)
    /// - One of the partitions does not exist (`MissingPartition`)
    /// - The engine fails to open the database
    fn open(
        &self,
        path: &Path,
        partitions: &[&str],
    ) -> EngineResult<(Self::Store, Vec<PartitionHandle<Self>>)>;

    /// Opens the database at `path`, creating it (with only the default
    /// partition) if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created or opened.
    fn create(&self, path: &Path) -> EngineResult<Self::Store>;

    /// Deletes the database at `path`. Deleting a missing database succeeds.
    ///
    /// Only the engine's own files are removed; anything else under `path`
    /// is left in place. The database must not be open.
    ///
    /// # Errors
    ///
    /// Returns an error if the database files cannot be removed.
    fn destroy(&self, path: &Path) -> EngineResult<()>;
}

/// Shorthand for the partition handle type of an engine.
pub type PartitionHandle<E> = <<E as Engine>::Store as EngineStore>::Partition;

/// An open database.
///
/// All methods take `&self`: stores must be safe to share across threads,
/// with whatever internal synchronisation the engine needs.
pub trait EngineStore: Send + Sync {
    /// Opaque per-partition handle.
    type Partition: Clone + fmt::Debug + Send + Sync;

    /// Ordered iterator over one partition.
    type Iter: EngineIter;

    /// Creates a named partition.
    ///
    /// # Errors
    ///
    /// Returns `PartitionExists` if the partition is already present, or
    /// an engine error.
    fn create_partition(&self, name: &str) -> EngineResult<()>;

    /// Inserts or replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be made durable.
    fn put(&self, partition: &Self::Partition, key: &[u8], value: &[u8]) -> EngineResult<()>;

    /// Returns a copy of the value stored under `key`, or `None`.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than absence.
    fn get(&self, partition: &Self::Partition, key: &[u8]) -> EngineResult<Option<Vec<u8>>>;

    /// Removes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete cannot be made durable.
    fn delete(&self, partition: &Self::Partition, key: &[u8]) -> EngineResult<()>;

    /// Returns true if `key` is present.
    ///
    /// The default is a point lookup; engines may override it with a
    /// cheaper existence check.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than absence.
    fn contains(&self, partition: &Self::Partition, key: &[u8]) -> EngineResult<bool> {
        Ok(self.get(partition, key)?.is_some())
    }

    /// Creates an unpositioned iterator over `partition`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot provide a read view.
    fn iter(&self, partition: &Self::Partition) -> EngineResult<Self::Iter>;
}

/// A forward iterator over one partition, in byte order.
///
/// A fresh iterator is not positioned; call [`seek`](EngineIter::seek)
/// first. `key` and `value` may only be called while `valid` is true.
pub trait EngineIter {
    /// Positions at the first key greater than or equal to `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine fails to read.
    fn seek(&mut self, key: &[u8]) -> EngineResult<()>;

    /// Moves to the next key.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine fails to read.
    fn next(&mut self) -> EngineResult<()>;

    /// Returns true if the iterator is positioned on a record.
    fn valid(&self) -> bool;

    /// The current key. Empty when not valid.
    fn key(&self) -> &[u8];

    /// The current value. Empty when not valid.
    fn value(&self) -> &[u8];
}
