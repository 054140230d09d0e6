//! In-memory engine for testing.

use crate::engine::{Engine, EngineIter, EngineStore, PartitionHandle, DEFAULT_PARTITION};
use crate::error::{EngineError, EngineResult};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Bound;
use std::path::{Path, PathBuf};
use std::sync::Arc;

type Tree = Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>;

#[derive(Debug)]
struct MemoryDatabase {
    partitions: RwLock<HashMap<String, Tree>>,
}

impl MemoryDatabase {
    fn new() -> Self {
        let mut partitions = HashMap::new();
        partitions.insert(DEFAULT_PARTITION.to_string(), Tree::default());
        Self {
            partitions: RwLock::new(partitions),
        }
    }
}

/// An in-memory engine.
///
/// Databases live in a map keyed by path that is shared between clones of
/// the engine, so a database "survives" being closed and reopened for as
/// long as some clone of the engine is alive. This makes it suitable for:
/// - Unit tests of bootstrap and restart behaviour
/// - Integration tests
/// - Ephemeral databases that don't need persistence
///
/// No files are touched; paths are only used as names.
///
/// # Thread Safety
///
/// This engine is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use partikv_engine::{Engine, EngineStore, MemoryEngine, DEFAULT_PARTITION};
/// use std::path::Path;
///
/// let engine = MemoryEngine::new();
/// engine.create(Path::new("db")).unwrap();
///
/// let (store, handles) = engine.open(Path::new("db"), &[DEFAULT_PARTITION]).unwrap();
/// store.put(&handles[0], b"key", b"value").unwrap();
/// assert_eq!(store.get(&handles[0], b"key").unwrap(), Some(b"value".to_vec()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryEngine {
    databases: Arc<RwLock<HashMap<PathBuf, Arc<MemoryDatabase>>>>,
}

impl MemoryEngine {
    /// Creates a new engine with no databases.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a database exists at `path`.
    #[must_use]
    pub fn exists(&self, path: &Path) -> bool {
        self.databases.read().contains_key(path)
    }

    /// Returns the partition names of the database at `path`, sorted.
    #[must_use]
    pub fn partition_names(&self, path: &Path) -> Option<Vec<String>> {
        let databases = self.databases.read();
        let db = databases.get(path)?;
        let mut names: Vec<String> = db.partitions.read().keys().cloned().collect();
        names.sort();
        Some(names)
    }
}

impl Engine for MemoryEngine {
    type Store = MemoryStore;

    fn open(
        &self,
        path: &Path,
        partitions: &[&str],
    ) -> EngineResult<(MemoryStore, Vec<PartitionHandle<Self>>)> {
        let db = self
            .databases
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| EngineError::MissingDatabase {
                path: path.to_path_buf(),
            })?;

        let handles = {
            let existing = db.partitions.read();
            partitions
                .iter()
                .map(|name| {
                    existing
                        .get(*name)
                        .map(|tree| MemoryPartition {
                            name: Arc::from(*name),
                            tree: Arc::clone(tree),
                        })
                        .ok_or_else(|| EngineError::MissingPartition {
                            name: (*name).to_string(),
                        })
                })
                .collect::<EngineResult<Vec<_>>>()?
        };

        Ok((MemoryStore { db }, handles))
    }

    fn create(&self, path: &Path) -> EngineResult<MemoryStore> {
        let db = self
            .databases
            .write()
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(MemoryDatabase::new()))
            .clone();
        Ok(MemoryStore { db })
    }

    /// Forgets the database at `path`. Stores that are still open keep
    /// working on their detached copy.
    fn destroy(&self, path: &Path) -> EngineResult<()> {
        self.databases.write().remove(path);
        Ok(())
    }
}

/// An open in-memory database.
#[derive(Debug)]
pub struct MemoryStore {
    db: Arc<MemoryDatabase>,
}

/// Handle to one partition of a [`MemoryStore`].
#[derive(Clone)]
pub struct MemoryPartition {
    name: Arc<str>,
    tree: Tree,
}

impl MemoryPartition {
    /// The partition name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for MemoryPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryPartition")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl EngineStore for MemoryStore {
    type Partition = MemoryPartition;
    type Iter = MemoryIter;

    fn create_partition(&self, name: &str) -> EngineResult<()> {
        let mut partitions = self.db.partitions.write();
        if partitions.contains_key(name) {
            return Err(EngineError::PartitionExists {
                name: name.to_string(),
            });
        }
        partitions.insert(name.to_string(), Tree::default());
        Ok(())
    }

    fn put(&self, partition: &MemoryPartition, key: &[u8], value: &[u8]) -> EngineResult<()> {
        partition.tree.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, partition: &MemoryPartition, key: &[u8]) -> EngineResult<Option<Vec<u8>>> {
        Ok(partition.tree.read().get(key).cloned())
    }

    fn delete(&self, partition: &MemoryPartition, key: &[u8]) -> EngineResult<()> {
        partition.tree.write().remove(key);
        Ok(())
    }

    fn contains(&self, partition: &MemoryPartition, key: &[u8]) -> EngineResult<bool> {
        Ok(partition.tree.read().contains_key(key))
    }

    fn iter(&self, partition: &MemoryPartition) -> EngineResult<MemoryIter> {
        Ok(MemoryIter {
            tree: Arc::clone(&partition.tree),
            current: None,
        })
    }
}

/// Iterator over a [`MemoryPartition`].
///
/// Each step re-reads the tree, so writes made while iterating are visible
/// to later steps.
pub struct MemoryIter {
    tree: Tree,
    current: Option<(Vec<u8>, Vec<u8>)>,
}

impl MemoryIter {
    fn first_from(&self, from: Bound<&[u8]>) -> Option<(Vec<u8>, Vec<u8>)> {
        self.tree
            .read()
            .range::<[u8], _>((from, Bound::Unbounded))
            .next()
            .map(|(k, v)| (k.clone(), v.clone()))
    }
}

impl EngineIter for MemoryIter {
    fn seek(&mut self, key: &[u8]) -> EngineResult<()> {
        self.current = self.first_from(Bound::Included(key));
        Ok(())
    }

    fn next(&mut self) -> EngineResult<()> {
        if let Some((last, _)) = self.current.take() {
            self.current = self.first_from(Bound::Excluded(last.as_slice()));
        }
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
