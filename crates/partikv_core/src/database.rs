//! Database facade.

use crate::bootstrap::bootstrap;
use crate::config::Config;
use crate::cursor::Cursor;
use crate::error::CoreResult;
use crate::partition::{PartitionId, PartitionMap};
use crate::store::RecordStore;
use partikv_engine::{Engine, EngineStore, MemoryEngine, RedbEngine};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An open database with its partitions.
///
/// `Database` is the primary entry point for PartiKV. It provides:
/// - Bootstrap of the database and its partitions
/// - Record operations scoped to a partition
/// - Cursors over a partition
///
/// Partitions are addressed by [`PartitionId`]; the name to ID mapping
/// is returned by [`partitions`](Database::partitions).
///
/// # Opening a Database
///
/// ```rust,no_run
/// use partikv_core::Database;
///
/// let db = Database::open("my_database", &["DOT", "MSG"])?;
/// let msg = db.partition("MSG")?;
///
/// db.put(msg, b"key", b"value")?;
/// assert_eq!(db.get(msg, b"key")?, Some(b"value".to_vec()));
///
/// db.close()?;
/// # Ok::<(), partikv_core::CoreError>(())
/// ```
///
/// # Thread Safety
///
/// All record operations take `&self`. The engine synchronises concurrent
/// access, so a `Database` can be shared behind an `Arc`.
pub struct Database<E: Engine = RedbEngine> {
    path: PathBuf,
    records: RecordStore<E::Store>,
}

impl Database<RedbEngine> {
    /// Opens or creates a redb database at `path` with the given
    /// application partitions.
    ///
    /// # Errors
    ///
    /// Returns an error if a partition name is invalid or bootstrap fails.
    pub fn open<S: AsRef<str>>(path: impl AsRef<Path>, partitions: &[S]) -> CoreResult<Self> {
        let config = Config::new().partitions(partitions.iter().map(|s| s.as_ref().to_string()));
        Self::open_with_config(path, config)
    }

    /// Opens a redb database with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a partition name is invalid or bootstrap fails.
    pub fn open_with_config(path: impl AsRef<Path>, config: Config) -> CoreResult<Self> {
        let engine = RedbEngine::with_config(config.engine);
        Self::open_with_engine(&engine, path, config)
    }
}

impl Database<MemoryEngine> {
    /// Opens a fresh in-memory database. Nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if a partition name is invalid.
    pub fn open_in_memory<S: AsRef<str>>(partitions: &[S]) -> CoreResult<Self> {
        let config = Config::new().partitions(partitions.iter().map(|s| s.as_ref().to_string()));
        Self::open_with_engine(&MemoryEngine::new(), "memory", config)
    }
}

impl<E: Engine> Database<E> {
    /// Opens a database through any engine.
    ///
    /// # Errors
    ///
    /// Returns an error if a partition name is invalid or bootstrap fails.
    pub fn open_with_engine(
        engine: &E,
        path: impl AsRef<Path>,
        config: Config,
    ) -> CoreResult<Self> {
        let path = path.as_ref();
        let (store, registry) = bootstrap(engine, path, &config)?;
        Ok(Self {
            path: path.to_path_buf(),
            records: RecordStore::new(store, registry),
        })
    }

    /// The path the database was opened at.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name to ID mapping of the open partitions.
    #[must_use]
    pub fn partitions(&self) -> &PartitionMap {
        self.records.registry().map()
    }

    /// Returns the ID of a named partition.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPartitionName` if the name was not declared.
    pub fn partition(&self, name: &str) -> CoreResult<PartitionId> {
        self.partitions().require(name)
    }

    /// Inserts or replaces the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition is unknown, the key is empty, or
    /// the engine fails.
    pub fn put(&self, partition: PartitionId, key: &[u8], value: &[u8]) -> CoreResult<()> {
        self.records.put(partition, key, value)
    }

    /// Returns a copy of the value under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition is unknown, the key is empty, or
    /// the engine fails.
    pub fn get(&self, partition: PartitionId, key: &[u8]) -> CoreResult<Option<Vec<u8>>> {
        self.records.get(partition, key)
    }

    /// Removes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition is unknown, the key is empty, or
    /// the engine fails.
    pub fn delete(&self, partition: PartitionId, key: &[u8]) -> CoreResult<()> {
        self.records.delete(partition, key)
    }

    /// Returns true if `key` is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition is unknown, the key is empty, or
    /// the engine fails.
    pub fn exists(&self, partition: PartitionId, key: &[u8]) -> CoreResult<bool> {
        self.records.exists(partition, key)
    }

    /// Opens a cursor at the first key greater than or equal to `start`.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition is unknown or the engine fails.
    pub fn seek(
        &self,
        partition: PartitionId,
        start: &[u8],
    ) -> CoreResult<Cursor<<E::Store as EngineStore>::Iter>> {
        self.records.seek(partition, start)
    }

    /// Opens a cursor over the keys that start with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition is unknown or the engine fails.
    pub fn seek_prefix(
        &self,
        partition: PartitionId,
        prefix: &[u8],
    ) -> CoreResult<Cursor<<E::Store as EngineStore>::Iter>> {
        self.records.seek_prefix(partition, prefix)
    }

    /// The record store behind this database.
    #[must_use]
    pub fn records(&self) -> &RecordStore<E::Store> {
        &self.records
    }

    /// Closes the database, releasing the engine handle.
    ///
    /// Dropping the database has the same effect.
    ///
    /// # Errors
    ///
    /// Never fails with the bundled engines.
    pub fn close(self) -> CoreResult<()> {
        debug!("Closing database at {:?}", self.path);
        drop(self);
        Ok(())
    }
}

impl<E: Engine> fmt::Debug for Database<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path)
            .field("partitions", &self.partitions().names())
            .finish_non_exhaustive()
    }
}


/// Persistence tests that require a real file system.
#[cfg(test)]
mod persistence_tests {
    use super::*;
    use crate::error::CoreError;
    use partikv_engine::EngineError;
    use tempfile::tempdir;

    #[test]
    fn records_persist_across_restarts() {
        let temp = tempdir().unwrap();
        let db_path = temp.path().join("persist_test");

        {
            let db = Database::open(&db_path, &["DOT", "MSG"]).unwrap();
            db.put(db.partition("MSG").unwrap(), b"m1", b"hello").unwrap();
            db.put(PartitionId::DEFAULT, b"d1", b"").unwrap();
            db.close().unwrap();
        }

        {
            let db = Database::open(&db_path, &["DOT", "MSG"]).unwrap();
            let msg = db.partition("MSG").unwrap();
            assert_eq!(db.get(msg, b"m1").unwrap(), Some(b"hello".to_vec()));
            assert_eq!(db.get(PartitionId::DEFAULT, b"d1").unwrap(), Some(Vec::new()));
        }
    }

    #[test]
    fn reordered_partitions_keep_their_data() {
        let temp = tempdir().unwrap();
        let db_path = temp.path().join("reorder");

        {
            let db = Database::open(&db_path, &["DOT", "MSG"]).unwrap();
            db.put(db.partition("MSG").unwrap(), b"k", b"msg").unwrap();
        }

        let db = Database::open(&db_path, &["MSG", "DOT"]).unwrap();
        let msg = db.partition("MSG").unwrap();
        assert_eq!(msg, PartitionId::new(1));
        assert_eq!(db.get(msg, b"k").unwrap(), Some(b"msg".to_vec()));
    }

    #[test]
    fn added_partition_on_existing_database() {
        let temp = tempdir().unwrap();
        let db_path = temp.path().join("grow");

        {
            let db = Database::open(&db_path, &["DOT"]).unwrap();
            db.put(db.partition("DOT").unwrap(), b"k", b"v").unwrap();
        }

        let db = Database::open(&db_path, &["DOT", "ENTITY"]).unwrap();
        assert_eq!(db.get(db.partition("DOT").unwrap(), b"k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(db.get(db.partition("ENTITY").unwrap(), b"k").unwrap(), None);
    }

    #[test]
    fn open_without_create_fails_on_missing() {
        let temp = tempdir().unwrap();
        let config = Config::new().create_if_missing(false);

        let err = Database::open_with_config(temp.path().join("none"), config).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Bootstrap {
                source: EngineError::MissingDatabase { .. },
                ..
            }
        ));
    }

    #[test]
    fn cursor_spans_scan_batches() {
        let temp = tempdir().unwrap();
        let config = Config::new().scan_batch_size(3);
        let db = Database::open_with_config(temp.path().join("batches"), config).unwrap();

        for i in 0..10u8 {
            db.put(PartitionId::DEFAULT, &[b'k', i], &[i]).unwrap();
        }

        let values: Vec<u8> = db
            .seek(PartitionId::DEFAULT, b"")
            .unwrap()
            .into_entries()
            .map(|e| e.unwrap().1[0])
            .collect();
        assert_eq!(values, (0..10).collect::<Vec<_>>());
    }
}
