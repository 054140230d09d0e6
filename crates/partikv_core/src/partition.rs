//! Partition identifiers and the registry filled in by bootstrap.

use crate::error::{CoreError, CoreResult};
use partikv_engine::DEFAULT_PARTITION;
use std::collections::HashMap;
use std::fmt;

/// Index of a partition within an opened database.
///
/// A partition's index is its position in the declared partition list,
/// with the reserved default partition always at index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionId(pub u32);

impl PartitionId {
    /// The reserved default partition.
    pub const DEFAULT: Self = Self(0);

    /// Creates a new partition ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw index value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "part:{}", self.0)
    }
}

/// Name to index mapping of an opened database's partitions.
///
/// Index order is declaration order, default first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionMap {
    names: Vec<String>,
    ids: HashMap<String, PartitionId>,
}

impl PartitionMap {
    fn new(names: Vec<String>) -> Self {
        let ids = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), PartitionId(i as u32)))
            .collect();
        Self { names, ids }
    }

    /// Returns the ID registered for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<PartitionId> {
        self.ids.get(name).copied()
    }

    /// Returns the ID registered for `name`, or `UnknownPartitionName`.
    pub fn require(&self, name: &str) -> CoreResult<PartitionId> {
        self.get(name)
            .ok_or_else(|| CoreError::UnknownPartitionName { name: name.into() })
    }

    /// Returns the name registered at `id`.
    #[must_use]
    pub fn name(&self, id: PartitionId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Number of registered partitions, the default included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false once bootstrapped, since the default partition exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over `(id, name)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (PartitionId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (PartitionId(i as u32), name.as_str()))
    }

    /// Partition names in index order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Resolves partition IDs to the engine handles returned at bootstrap.
///
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct PartitionRegistry<P> {
    map: PartitionMap,
    handles: Vec<P>,
}

impl<P> PartitionRegistry<P> {
    /// Pairs declared names with engine handles, position by position.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the counts differ.
    pub fn new(names: Vec<String>, handles: Vec<P>) -> CoreResult<Self> {
        if names.len() != handles.len() {
            return Err(CoreError::invalid_config(format!(
                "engine returned {} partition handles for {} names",
                handles.len(),
                names.len()
            )));
        }
        Ok(Self {
            map: PartitionMap::new(names),
            handles,
        })
    }

    /// Returns the handle for `id`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPartition` if `id` was not registered.
    pub fn resolve(&self, id: PartitionId) -> CoreResult<&P> {
        self.handles
            .get(id.index())
            .ok_or(CoreError::UnknownPartition {
                id,
                count: self.handles.len(),
            })
    }

    /// The name to index mapping.
    #[must_use]
    pub fn map(&self) -> &PartitionMap {
        &self.map
    }

    /// Number of registered partitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Builds the full partition list for bootstrap: the default partition
/// followed by `names` in order.
///
/// # Errors
///
/// Returns `InvalidPartitionName` for an empty, duplicated or reserved name.
pub fn declared_partitions<S: AsRef<str>>(names: &[S]) -> CoreResult<Vec<String>> {
    let mut declared = Vec::with_capacity(names.len() + 1);
    declared.push(DEFAULT_PARTITION.to_string());

    for name in names {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(CoreError::invalid_partition_name(name, "name is empty"));
        }
        if name == DEFAULT_PARTITION {
            return Err(CoreError::invalid_partition_name(name, "name is reserved"));
        }
        if declared.iter().any(|d| d == name) {
            return Err(CoreError::invalid_partition_name(name, "declared twice"));
        }
        declared.push(name.to_string());
    }

    Ok(declared)
}
