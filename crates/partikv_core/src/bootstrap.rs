//! Open-or-create sequence for a database and its partitions.
//!
//! Bootstrap runs once per open:
//!
//! 1. Open the database requiring every declared partition.
//! 2. If that fails, create the database and each missing partition, then
//!    release the creation handle.
//! 3. Open again. A second failure is fatal; there is no further retry.
//!
//! The registry is built by pairing the declared names (default first) with
//! the handles returned by the successful open.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::partition::{declared_partitions, PartitionRegistry};
use partikv_engine::{Engine, EngineError, EngineResult, EngineStore, PartitionHandle};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Result of a successful bootstrap.
pub type Bootstrapped<E> = (<E as Engine>::Store, PartitionRegistry<PartitionHandle<E>>);

/// Opens the database at `path` with the partitions named in `config`,
/// creating whatever is missing.
///
/// # Errors
///
/// - `InvalidPartitionName` if the partition list is malformed (no I/O is done)
/// - `Bootstrap` if the database cannot be opened, or cannot be created and
///   then reopened
pub fn bootstrap<E: Engine>(
    engine: &E,
    path: &Path,
    config: &Config,
) -> CoreResult<Bootstrapped<E>> {
    let names = declared_partitions(&config.partitions)?;
    let required: Vec<&str> = names.iter().map(String::as_str).collect();

    debug!("Opening database at {:?} with partitions {:?}", path, required);
    let (store, handles) = match engine.open(path, &required) {
        Ok(opened) => opened,
        Err(first) => {
            if !config.create_if_missing {
                error!("Database at {:?} is not usable: {}", path, first);
                return Err(CoreError::bootstrap(path, first));
            }

            warn!("Open failed ({}), creating database at {:?}", first, path);
            create(engine, path, &required[1..]).map_err(|e| {
                error!("Creating database at {:?} failed: {}", path, e);
                CoreError::bootstrap(path, e)
            })?;

            engine.open(path, &required).map_err(|e| {
                error!("Reopening database at {:?} failed: {}", path, e);
                CoreError::bootstrap(path, e)
            })?
        }
    };

    let registry = PartitionRegistry::new(names, handles)?;
    info!(
        partitions = registry.len(),
        "Database ready at {:?}", path
    );
    Ok((store, registry))
}

/// Creates the database and each application partition, then drops the
/// creation handle so the engine releases its lock.
fn create<E: Engine>(engine: &E, path: &Path, partitions: &[&str]) -> EngineResult<()> {
    let store = engine.create(path)?;

    for &name in partitions {
        match store.create_partition(name) {
            Ok(()) => info!(partition = name, "Created partition"),
            Err(EngineError::PartitionExists { .. }) => {
                debug!(partition = name, "Partition already exists");
            }
            Err(e) => return Err(e),
        }
    }

    drop(store);
    Ok(())
}
