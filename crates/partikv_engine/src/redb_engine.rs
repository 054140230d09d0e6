//! Persistent engine backed by redb.
//!
//! Each database is a directory holding a single redb file. Partitions map
//! one-to-one onto redb tables named after the partition, so data location
//! depends on partition *names*, never on their position in a list.
//!
//! ```text
//! <db_path>/
//! └─ data.redb        # redb database, one table per partition
//! ```

use crate::engine::{Engine, EngineIter, EngineStore, PartitionHandle, DEFAULT_PARTITION};
use crate::error::{EngineError, EngineResult};
use redb::{Database, ReadOnlyTable, ReadableTable, TableDefinition, TableError};
use std::collections::VecDeque;
use std::fs;
use std::io::ErrorKind;
use std::ops::Bound;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File name of the redb database inside the database directory.
pub const DATA_FILE: &str = "data.redb";

/// Default number of records a cursor fetches per batch.
pub const DEFAULT_SCAN_BATCH_SIZE: usize = 256;

type Bytes = &'static [u8];

fn table(name: &str) -> TableDefinition<'_, Bytes, Bytes> {
    TableDefinition::new(name)
}

/// Configuration options for the redb engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedbConfig {
    /// Page cache size in bytes. Uses redb's default if not set.
    pub cache_size: Option<usize>,

    /// Records fetched per batch while iterating.
    pub scan_batch_size: usize,
}

impl Default for RedbConfig {
    fn default() -> Self {
        Self {
            cache_size: None,
            scan_batch_size: DEFAULT_SCAN_BATCH_SIZE,
        }
    }
}

impl RedbConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page cache size.
    #[must_use]
    pub const fn cache_size(mut self, bytes: usize) -> Self {
        self.cache_size = Some(bytes);
        self
    }

    /// Sets the cursor batch size. Zero is treated as one.
    #[must_use]
    pub const fn scan_batch_size(mut self, records: usize) -> Self {
        self.scan_batch_size = if records == 0 { 1 } else { records };
        self
    }
}

/// An engine that stores each database in a redb file.
///
/// # Example
///
/// ```no_run
/// use partikv_engine::{Engine, EngineStore, RedbEngine, DEFAULT_PARTITION};
/// use std::path::Path;
///
/// let engine = RedbEngine::new();
/// let store = engine.create(Path::new("my_db")).unwrap();
/// store.create_partition("events").unwrap();
/// drop(store);
///
/// let (store, handles) = engine
///     .open(Path::new("my_db"), &[DEFAULT_PARTITION, "events"])
///     .unwrap();
/// store.put(&handles[1], b"key", b"value").unwrap();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RedbEngine {
    config: RedbConfig,
}

impl RedbEngine {
    /// Creates an engine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the given configuration.
    #[must_use]
    pub const fn with_config(config: RedbConfig) -> Self {
        Self { config }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &RedbConfig {
        &self.config
    }

    /// Returns the path of the redb file for a database directory.
    #[must_use]
    pub fn data_path(path: &Path) -> PathBuf {
        path.join(DATA_FILE)
    }

    fn builder(&self) -> redb::Builder {
        let mut builder = Database::builder();
        if let Some(cache_size) = self.config.cache_size {
            builder.set_cache_size(cache_size);
        }
        builder
    }

    fn store(&self, path: &Path, db: Database) -> RedbStore {
        RedbStore {
            path: path.to_path_buf(),
            db,
            scan_batch_size: self.config.scan_batch_size,
        }
    }
}

impl Engine for RedbEngine {
    type Store = RedbStore;

    fn open(
        &self,
        path: &Path,
        partitions: &[&str],
    ) -> EngineResult<(RedbStore, Vec<PartitionHandle<Self>>)> {
        let file = Self::data_path(path);
        if !file.is_file() {
            return Err(EngineError::MissingDatabase {
                path: path.to_path_buf(),
            });
        }

        let db = self
            .builder()
            .open(&file)
            .map_err(|e| EngineError::backend("open", e))?;
        let store = self.store(path, db);

        let mut handles = Vec::with_capacity(partitions.len());
        for name in partitions {
            if !store.has_partition(name)? {
                return Err(EngineError::MissingPartition {
                    name: (*name).to_string(),
                });
            }
            handles.push(RedbPartition {
                name: Arc::from(*name),
            });
        }

        Ok((store, handles))
    }

    fn create(&self, path: &Path) -> EngineResult<RedbStore> {
        fs::create_dir_all(path)?;
        let db = self
            .builder()
            .create(Self::data_path(path))
            .map_err(|e| EngineError::backend("create", e))?;
        let store = self.store(path, db);

        match store.create_partition(DEFAULT_PARTITION) {
            Ok(()) | Err(EngineError::PartitionExists { .. }) => Ok(store),
            Err(e) => Err(e),
        }
    }

    fn destroy(&self, path: &Path) -> EngineResult<()> {
        match fs::remove_file(Self::data_path(path)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        // Anything else in the directory belongs to someone else.
        let empty = match fs::read_dir(path) {
            Ok(mut entries) => entries.next().is_none(),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        if empty {
            fs::remove_dir(path)?;
        }
        Ok(())
    }
}

/// An open redb database.
#[derive(Debug)]
pub struct RedbStore {
    path: PathBuf,
    db: Database,
    scan_batch_size: usize,
}

impl RedbStore {
    /// Returns the database directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if a partition with this name exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a read transaction cannot be started.
    pub fn has_partition(&self, name: &str) -> EngineResult<bool> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| EngineError::backend("begin read", e))?;
        match txn.open_table(table(name)) {
            Ok(_) => Ok(true),
            Err(TableError::TableDoesNotExist(_)) => Ok(false),
            Err(e) => Err(EngineError::backend("open partition", e)),
        }
    }

    fn read_table(&self, partition: &RedbPartition) -> EngineResult<ReadOnlyTable<Bytes, Bytes>> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| EngineError::backend("begin read", e))?;
        txn.open_table(table(&partition.name)).map_err(|e| match e {
            TableError::TableDoesNotExist(_) => EngineError::MissingPartition {
                name: partition.name.to_string(),
            },
            e => EngineError::backend("open partition", e),
        })
    }
}

/// Handle to one partition of a [`RedbStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedbPartition {
    name: Arc<str>,
}

impl RedbPartition {
    /// The partition (table) name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl EngineStore for RedbStore {
    type Partition = RedbPartition;
    type Iter = RedbIter;

    fn create_partition(&self, name: &str) -> EngineResult<()> {
        if self.has_partition(name)? {
            return Err(EngineError::PartitionExists {
                name: name.to_string(),
            });
        }

        let txn = self
            .db
            .begin_write()
            .map_err(|e| EngineError::backend("begin write", e))?;
        txn.open_table(table(name))
            .map_err(|e| EngineError::backend("create partition", e))?;
        txn.commit()
            .map_err(|e| EngineError::backend("commit", e))
    }

    fn put(&self, partition: &RedbPartition, key: &[u8], value: &[u8]) -> EngineResult<()> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| EngineError::backend("begin write", e))?;
        {
            let mut t = txn
                .open_table(table(&partition.name))
                .map_err(|e| EngineError::backend("open partition", e))?;
            t.insert(key, value)
                .map_err(|e| EngineError::backend("put", e))?;
        }
        txn.commit()
            .map_err(|e| EngineError::backend("commit", e))
    }

    fn get(&self, partition: &RedbPartition, key: &[u8]) -> EngineResult<Option<Vec<u8>>> {
        let t = self.read_table(partition)?;
        let value = t.get(key).map_err(|e| EngineError::backend("get", e))?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn delete(&self, partition: &RedbPartition, key: &[u8]) -> EngineResult<()> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| EngineError::backend("begin write", e))?;
        {
            let mut t = txn
                .open_table(table(&partition.name))
                .map_err(|e| EngineError::backend("open partition", e))?;
            t.remove(key)
                .map_err(|e| EngineError::backend("delete", e))?;
        }
        txn.commit()
            .map_err(|e| EngineError::backend("commit", e))
    }

    fn iter(&self, partition: &RedbPartition) -> EngineResult<RedbIter> {
        Ok(RedbIter {
            table: self.read_table(partition)?,
            batch: VecDeque::new(),
            batch_size: self.scan_batch_size,
            drained: true,
            current: None,
        })
    }
}

/// Iterator over a [`RedbPartition`].
///
/// Reads from the snapshot taken when the iterator was created. Records are
/// fetched in batches so that a cursor over a large partition does not
/// materialise the whole table.
pub struct RedbIter {
    table: ReadOnlyTable<Bytes, Bytes>,
    batch: VecDeque<(Vec<u8>, Vec<u8>)>,
    batch_size: usize,
    /// True once the last fetch reached the end of the table.
    drained: bool,
    current: Option<(Vec<u8>, Vec<u8>)>,
}

impl RedbIter {
    fn fetch(&mut self, from: Bound<Vec<u8>>) -> EngineResult<()> {
        self.batch.clear();
        let lower = from.as_ref().map(Vec::as_slice);
        let range = self
            .table
            .range::<&[u8]>((lower, Bound::Unbounded))
            .map_err(|e| EngineError::backend("range", e))?;

        for entry in range.take(self.batch_size) {
            let (k, v) = entry.map_err(|e| EngineError::backend("range", e))?;
            self.batch.push_back((k.value().to_vec(), v.value().to_vec()));
        }
        self.drained = self.batch.len() < self.batch_size;
        Ok(())
    }
}

impl EngineIter for RedbIter {
    fn seek(&mut self, key: &[u8]) -> EngineResult<()> {
        self.fetch(Bound::Included(key.to_vec()))?;
        self.current = self.batch.pop_front();
        Ok(())
    }

    fn next(&mut self) -> EngineResult<()> {
        let Some((last, _)) = self.current.take() else {
            return Ok(());
        };
        if self.batch.is_empty() && !self.drained {
            self.fetch(Bound::Excluded(last))?;
        }
        self.current = self.batch.pop_front();
        Ok(())
    }

    fn valid(&self) -> bool {
        self.current.is_some()
    }

    fn key(&self) -> &[u8] {
        self.current.as_ref().map_or(&[][..], |(k, _)| k.as_slice())
    }

    fn value(&self) -> &[u8] {
        self.current.as_ref().map_or(&[][..], |(_, v)| v.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn redb_open_missing_database_fails() {
        let dir = tempdir().unwrap();
        let result = RedbEngine::new().open(&dir.path().join("db"), &[DEFAULT_PARTITION]);
        assert!(matches!(result, Err(EngineError::MissingDatabase { .. })));
    }

    #[test]
    fn redb_create_makes_directory_and_default_partition() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("db");

        let store = RedbEngine::new().create(&path).unwrap();
        assert!(RedbEngine::data_path(&path).is_file());
        assert!(store.has_partition(DEFAULT_PARTITION).unwrap());
        assert_eq!(store.path(), path);
    }

    #[test]
    fn redb_create_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db");
        let engine = RedbEngine::new();

        drop(engine.create(&path).unwrap());
        let store = engine.create(&path).unwrap();
        assert!(store.has_partition(DEFAULT_PARTITION).unwrap());
    }

    #[test]
    fn redb_open_missing_partition_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db");
        let engine = RedbEngine::new();
        drop(engine.create(&path).unwrap());

        let result = engine.open(&path, &[DEFAULT_PARTITION, "MSG"]);
        assert!(matches!(
            result,
            Err(EngineError::MissingPartition { ref name }) if name == "MSG"
        ));
    }

    #[test]
    fn redb_destroy_removes_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db");
        let engine = RedbEngine::new();
        drop(engine.create(&path).unwrap());

        engine.destroy(&path).unwrap();
        assert!(!path.exists());
        engine.destroy(&path).unwrap();

        let result = engine.open(&path, &[DEFAULT_PARTITION]);
        assert!(matches!(result, Err(EngineError::MissingDatabase { .. })));
    }

    #[test]
    fn redb_destroy_leaves_foreign_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db");
        let engine = RedbEngine::new();
        drop(engine.create(&path).unwrap());
        fs::write(path.join("notes.txt"), b"keep").unwrap();

        engine.destroy(&path).unwrap();
        assert!(!RedbEngine::data_path(&path).exists());
        assert_eq!(fs::read(path.join("notes.txt")).unwrap(), b"keep");
    }

    #[test]
    fn redb_destroy_leaves_nested_databases() {
        let dir = tempdir().unwrap();
        let outer = dir.path().join("data");
        let inner = outer.join("persist");
        let engine = RedbEngine::new();
        drop(engine.create(&outer).unwrap());
        drop(engine.create(&inner).unwrap());

        engine.destroy(&outer).unwrap();
        assert!(RedbEngine::data_path(&inner).is_file());
        assert!(engine.open(&inner, &[DEFAULT_PARTITION]).is_ok());
    }

    #[test]
    fn redb_create_partition_twice_fails() {
        let dir = tempdir().unwrap();
        let store = RedbEngine::new().create(&dir.path().join("db")).unwrap();

        store.create_partition("MSG").unwrap();
        let result = store.create_partition("MSG");
        assert!(matches!(result, Err(EngineError::PartitionExists { .. })));
    }

    #[test]
    fn redb_put_get_delete() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db");
        let engine = RedbEngine::new();
        drop(engine.create(&path).unwrap());
        let (store, handles) = engine.open(&path, &[DEFAULT_PARTITION]).unwrap();
        let p = &handles[0];

        assert_eq!(store.get(p, b"k").unwrap(), None);
        store.put(p, b"k", b"v1").unwrap();
        store.put(p, b"k", b"v2").unwrap();
        assert_eq!(store.get(p, b"k").unwrap(), Some(b"v2".to_vec()));
        assert!(store.contains(p, b"k").unwrap());

        store.delete(p, b"k").unwrap();
        store.delete(p, b"k").unwrap();
        assert!(!store.contains(p, b"k").unwrap());
    }

    #[test]
    fn redb_empty_value_is_not_absence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db");
        let engine = RedbEngine::new();
        drop(engine.create(&path).unwrap());
        let (store, handles) = engine.open(&path, &[DEFAULT_PARTITION]).unwrap();

        store.put(&handles[0], b"k", b"").unwrap();
        assert_eq!(store.get(&handles[0], b"k").unwrap(), Some(Vec::new()));
    }

    #[test]
    fn redb_data_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db");
        let engine = RedbEngine::new();
        {
            let store = engine.create(&path).unwrap();
            store.create_partition("DOT").unwrap();
        }
        {
            let (store, handles) = engine.open(&path, &[DEFAULT_PARTITION, "DOT"]).unwrap();
            store.put(&handles[1], b"hash", b"dot").unwrap();
        }

        let (store, handles) = engine.open(&path, &[DEFAULT_PARTITION, "DOT"]).unwrap();
        assert_eq!(store.get(&handles[1], b"hash").unwrap(), Some(b"dot".to_vec()));
        assert_eq!(store.get(&handles[0], b"hash").unwrap(), None);
    }

    #[test]
    fn redb_iter_crosses_batch_boundaries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db");
        let engine = RedbEngine::with_config(RedbConfig::new().scan_batch_size(2));
        drop(engine.create(&path).unwrap());
        let (store, handles) = engine.open(&path, &[DEFAULT_PARTITION]).unwrap();
        for i in 0..7u8 {
            store.put(&handles[0], &[b'k', i], &[i]).unwrap();
        }

        let mut iter = store.iter(&handles[0]).unwrap();
        iter.seek(b"k").unwrap();
        let mut seen = Vec::new();
        while iter.valid() {
            seen.push(iter.value()[0]);
            iter.next().unwrap();
        }
        assert_eq!(seen, (0..7u8).collect::<Vec<_>>());
    }

    fn scan_from<I: EngineIter>(iter: &mut I, start: &[u8]) -> Vec<Vec<u8>> {
        iter.seek(start).unwrap();
        let mut keys = Vec::new();
        while iter.valid() {
            keys.push(iter.key().to_vec());
            iter.next().unwrap();
        }
        keys
    }

    proptest::proptest! {
        #![proptest_config(proptest::prelude::ProptestConfig::with_cases(16))]

        #[test]
        fn redb_iter_matches_memory_engine(
            keys in proptest::collection::vec(proptest::collection::vec(0u8..4, 1..4), 0..30),
            start in proptest::collection::vec(0u8..4, 0..3),
            batch in 1usize..5,
        ) {
            let dir = tempdir().unwrap();
            let path = dir.path().join("db");
            let redb = RedbEngine::with_config(RedbConfig::new().scan_batch_size(batch));
            let memory = crate::MemoryEngine::new();
            drop(redb.create(&path).unwrap());
            drop(memory.create(&path).unwrap());
            let (redb_store, redb_handles) = redb.open(&path, &[DEFAULT_PARTITION]).unwrap();
            let (mem_store, mem_handles) = memory.open(&path, &[DEFAULT_PARTITION]).unwrap();

            for key in &keys {
                redb_store.put(&redb_handles[0], key, b"").unwrap();
                mem_store.put(&mem_handles[0], key, b"").unwrap();
            }

            let from_redb = scan_from(&mut redb_store.iter(&redb_handles[0]).unwrap(), &start);
            let from_memory = scan_from(&mut mem_store.iter(&mem_handles[0]).unwrap(), &start);
            proptest::prop_assert_eq!(from_redb, from_memory);
        }
    }

    #[test]
    fn config_builder() {
        let config = RedbConfig::new().cache_size(1024).scan_batch_size(0);
        assert_eq!(config.cache_size, Some(1024));
        assert_eq!(config.scan_batch_size, 1);
        assert_eq!(RedbConfig::default().scan_batch_size, DEFAULT_SCAN_BATCH_SIZE);
    }
}
