//! Test fixtures and database helpers.
//!
//! Provides convenience functions for setting up test databases
//! and common test scenarios.

use partikv_core::{Database, MemoryEngine};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An in-memory database.
pub type MemoryDatabase = Database<MemoryEngine>;

/// A redb-backed test database in a temporary directory.
///
/// The directory is removed when the fixture is dropped.
pub struct TestDatabase {
    /// The database instance.
    pub db: Database,
    partitions: Vec<String>,
    temp_dir: TempDir,
}

impl TestDatabase {
    /// Creates a database with the given application partitions.
    pub fn new(partitions: &[&str]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let partitions: Vec<String> = partitions.iter().map(|p| (*p).to_string()).collect();
        let db = Database::open(temp_dir.path().join("db"), &partitions)
            .expect("Failed to open file database");
        Self {
            db,
            partitions,
            temp_dir,
        }
    }

    /// The database directory.
    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().join("db")
    }

    /// Closes the database and bootstraps it again from disk.
    #[must_use]
    pub fn reopen(self) -> Self {
        self.reopen_with(&[])
    }

    /// Closes the database and bootstraps it again, declaring `extra`
    /// partitions after the existing ones.
    #[must_use]
    pub fn reopen_with(self, extra: &[&str]) -> Self {
        let Self {
            db,
            mut partitions,
            temp_dir,
        } = self;
        db.close().expect("Failed to close database");

        partitions.extend(extra.iter().map(|p| (*p).to_string()));
        let db = Database::open(temp_dir.path().join("db"), &partitions)
            .expect("Failed to reopen database");
        Self {
            db,
            partitions,
            temp_dir,
        }
    }
}

impl std::ops::Deref for TestDatabase {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Opens a fresh in-memory database.
pub fn memory_db(partitions: &[&str]) -> MemoryDatabase {
    Database::open_in_memory(partitions).expect("Failed to open in-memory database")
}

/// Runs a test with a temporary in-memory database.
///
/// # Example
///
/// ```rust
/// use partikv_testkit::with_temp_db;
///
/// with_temp_db(&["DOT"], |db| {
///     assert_eq!(db.partitions().len(), 2);
/// });
/// ```
pub fn with_temp_db<F, R>(partitions: &[&str], f: F) -> R
where
    F: FnOnce(&MemoryDatabase) -> R,
{
    let db = memory_db(partitions);
    f(&db)
}

/// Runs a test with a temporary redb database.
pub fn with_file_db<F, R>(partitions: &[&str], f: F) -> R
where
    F: FnOnce(&Database, &Path) -> R,
{
    let test_db = TestDatabase::new(partitions);
    let path = test_db.path();
    f(&test_db.db, &path)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use partikv_core::{Engine, PartitionId};

    /// Key used for record `i` by [`populate`].
    pub fn record_key(i: usize) -> Vec<u8> {
        format!("key:{i:06}").into_bytes()
    }

    /// Value stored for record `i` by [`populate`].
    pub fn record_value(i: usize) -> Vec<u8> {
        format!("value:{i}").into_bytes()
    }

    /// Writes `count` records into `partition`.
    pub fn populate<E: Engine>(db: &Database<E>, partition: PartitionId, count: usize) {
        for i in 0..count {
            db.put(partition, &record_key(i), &record_value(i))
                .expect("Failed to populate");
        }
    }

    /// Creates an in-memory database with `count` records in the default
    /// partition.
    pub fn populated_database(count: usize) -> MemoryDatabase {
        let db = memory_db(&[]);
        populate(&db, PartitionId::DEFAULT, count);
        db
    }
}
