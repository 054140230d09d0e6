//! Database configuration.

use partikv_engine::RedbConfig;
use std::path::PathBuf;

/// Configuration for opening a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Whether to create the database and its partitions if missing.
    pub create_if_missing: bool,

    /// Application partition names, in index order after the default.
    pub partitions: Vec<String>,

    /// Settings passed to the redb engine.
    pub engine: RedbConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            partitions: Vec::new(),
            engine: RedbConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the database if missing.
    #[must_use]
    pub fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Replaces the application partition list.
    #[must_use]
    pub fn partitions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partitions = names.into_iter().map(Into::into).collect();
        self
    }

    /// Appends one application partition.
    #[must_use]
    pub fn partition(mut self, name: impl Into<String>) -> Self {
        self.partitions.push(name.into());
        self
    }

    /// Sets the engine page cache size in bytes.
    #[must_use]
    pub fn cache_size(mut self, bytes: usize) -> Self {
        self.engine = self.engine.cache_size(bytes);
        self
    }

    /// Sets how many records a cursor fetches per batch.
    #[must_use]
    pub fn scan_batch_size(mut self, records: usize) -> Self {
        self.engine = self.engine.scan_batch_size(records);
        self
    }
}

/// Configuration for a [`DualStore`](crate::DualStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualConfig {
    /// Path of the durable database.
    pub persist_path: PathBuf,

    /// Path of the disposable cache database.
    pub cache_path: PathBuf,

    /// Whether to delete the cache database before opening it.
    pub discard_cache_on_open: bool,

    /// Settings passed to the redb engine for both databases.
    pub engine: RedbConfig,
}

impl DualConfig {
    /// Creates a configuration for the given pair of paths.
    #[must_use]
    pub fn new(persist_path: impl Into<PathBuf>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            persist_path: persist_path.into(),
            cache_path: cache_path.into(),
            discard_cache_on_open: false,
            engine: RedbConfig::default(),
        }
    }

    /// Sets whether to delete the cache database before opening it.
    #[must_use]
    pub fn discard_cache_on_open(mut self, value: bool) -> Self {
        self.discard_cache_on_open = value;
        self
    }

    /// Sets the engine configuration for both databases.
    #[must_use]
    pub fn engine(mut self, engine: RedbConfig) -> Self {
        self.engine = engine;
        self
    }

    /// The configuration each half of the pair is opened with.
    #[must_use]
    pub fn store_config(&self) -> Config {
        Config {
            engine: self.engine,
            ..Config::default()
        }
    }
}
