//! CLI command implementations.

pub mod init;
pub mod partitions;
pub mod record;
pub mod scan;

use partikv_core::{Config, Database, PartitionId};
use std::path::Path;

/// Result type for command implementations.
pub type CommandResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// The database and partition a record command operates on.
pub struct Target<'a> {
    /// Database directory.
    pub path: &'a Path,
    /// Declared application partitions.
    pub partitions: &'a [String],
    /// Partition the command reads or writes.
    pub partition: &'a str,
}

impl<'a> Target<'a> {
    /// Bundles the command-line arguments naming a partition.
    pub fn new(path: &'a Path, partitions: &'a [String], partition: &'a str) -> Self {
        Self {
            path,
            partitions,
            partition,
        }
    }

    /// Opens the existing database and resolves the partition.
    ///
    /// Record commands never create anything; use `init` first.
    pub fn open(&self) -> CommandResult<(Database, PartitionId)> {
        let db = open_existing(self.path, self.partitions)?;
        let id = db.partition(self.partition)?;
        Ok((db, id))
    }
}

/// Opens a database that must already hold every declared partition.
pub fn open_existing(path: &Path, partitions: &[String]) -> CommandResult<Database> {
    let config = Config::new()
        .create_if_missing(false)
        .partitions(partitions.iter().cloned());
    Ok(Database::open_with_config(path, config)?)
}
