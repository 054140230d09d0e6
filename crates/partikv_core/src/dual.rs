//! A durable database paired with a disposable cache database.

use crate::config::DualConfig;
use crate::cursor::Cursor;
use crate::database::Database;
use crate::error::{CoreError, CoreResult};
use crate::partition::PartitionId;
use partikv_engine::{Engine, EngineStore, RedbEngine};
use tracing::info;

type Iter<E> = <<E as Engine>::Store as EngineStore>::Iter;

/// Two independent databases: `persist` for durable records and `cache`
/// for records that may be thrown away.
///
/// Each database carries only the default partition. Records never move
/// between the two on their own.
///
/// # Example
///
/// ```rust,no_run
/// use partikv_core::{DualConfig, DualStore};
///
/// let store = DualStore::open(DualConfig::new("data/persist", "data/cache"))?;
/// store.put_persist(b"user:1", b"alice")?;
/// store.put_cache(b"session:9", b"token")?;
/// assert!(store.get_persist(b"session:9")?.is_none());
/// # Ok::<(), partikv_core::CoreError>(())
/// ```
#[derive(Debug)]
pub struct DualStore<E: Engine = RedbEngine> {
    persist: Database<E>,
    cache: Database<E>,
}

impl DualStore<RedbEngine> {
    /// Opens both databases with redb.
    ///
    /// # Errors
    ///
    /// Returns an error if one path lies inside the other or either
    /// bootstrap fails.
    pub fn open(config: DualConfig) -> CoreResult<Self> {
        let engine = RedbEngine::with_config(config.engine);
        Self::open_with_engine(&engine, &config)
    }
}

impl<E: Engine> DualStore<E> {
    /// Opens both databases through any engine.
    ///
    /// # Errors
    ///
    /// Returns an error if one path lies inside the other or either
    /// bootstrap fails.
    pub fn open_with_engine(engine: &E, config: &DualConfig) -> CoreResult<Self> {
        let (persist_path, cache_path) = (&config.persist_path, &config.cache_path);
        if persist_path.starts_with(cache_path) || cache_path.starts_with(persist_path) {
            return Err(CoreError::invalid_config(format!(
                "persist database {} and cache database {} overlap",
                persist_path.display(),
                cache_path.display()
            )));
        }

        if config.discard_cache_on_open {
            info!("Discarding cache database at {:?}", cache_path);
            engine.destroy(cache_path)?;
        }

        let persist = Database::open_with_engine(engine, persist_path, config.store_config())?;
        let cache = Database::open_with_engine(engine, cache_path, config.store_config())?;
        Ok(Self { persist, cache })
    }

    /// The durable database.
    #[must_use]
    pub fn persist(&self) -> &Database<E> {
        &self.persist
    }

    /// The cache database.
    #[must_use]
    pub fn cache(&self) -> &Database<E> {
        &self.cache
    }

    /// Writes `key` to the durable database.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the engine fails.
    pub fn put_persist(&self, key: &[u8], value: &[u8]) -> CoreResult<()> {
        self.persist.put(PartitionId::DEFAULT, key, value)
    }

    /// Writes `key` to the cache database.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the engine fails.
    pub fn put_cache(&self, key: &[u8], value: &[u8]) -> CoreResult<()> {
        self.cache.put(PartitionId::DEFAULT, key, value)
    }

    /// Reads `key` from the durable database.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the engine fails.
    pub fn get_persist(&self, key: &[u8]) -> CoreResult<Option<Vec<u8>>> {
        self.persist.get(PartitionId::DEFAULT, key)
    }

    /// Reads `key` from the cache database.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the engine fails.
    pub fn get_cache(&self, key: &[u8]) -> CoreResult<Option<Vec<u8>>> {
        self.cache.get(PartitionId::DEFAULT, key)
    }

    /// Removes `key` from the durable database.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the engine fails.
    pub fn delete_persist(&self, key: &[u8]) -> CoreResult<()> {
        self.persist.delete(PartitionId::DEFAULT, key)
    }

    /// Removes `key` from the cache database.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the engine fails.
    pub fn delete_cache(&self, key: &[u8]) -> CoreResult<()> {
        self.cache.delete(PartitionId::DEFAULT, key)
    }

    /// Returns true if `key` is in the durable database.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the engine fails.
    pub fn exists_persist(&self, key: &[u8]) -> CoreResult<bool> {
        self.persist.exists(PartitionId::DEFAULT, key)
    }

    /// Returns true if `key` is in the cache database.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the engine fails.
    pub fn exists_cache(&self, key: &[u8]) -> CoreResult<bool> {
        self.cache.exists(PartitionId::DEFAULT, key)
    }

    /// Opens a cursor over the durable database.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine fails.
    pub fn seek_persist(&self, start: &[u8]) -> CoreResult<Cursor<Iter<E>>> {
        self.persist.seek(PartitionId::DEFAULT, start)
    }

    /// Opens a cursor over the cache database.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine fails.
    pub fn seek_cache(&self, start: &[u8]) -> CoreResult<Cursor<Iter<E>>> {
        self.cache.seek(PartitionId::DEFAULT, start)
    }
}
