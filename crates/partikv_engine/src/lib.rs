//! # PartiKV Engine
//!
//! Engine boundary traits and engine adapters for PartiKV.
//!
//! This crate is the lowest layer of PartiKV. An engine is an **opaque
//! ordered key-value store** with named partitions; PartiKV consumes exactly
//! these capabilities and nothing more:
//!
//! - open a database requiring a list of named partitions
//! - create a database, and create named partitions in it
//! - point put/get/delete keyed by (partition handle, key)
//! - ordered iteration with seek/next keyed by partition handle
//! - a status that tells "not found" (`Ok(None)`) apart from failures
//!
//! ## Available Engines
//!
//! - [`RedbEngine`] - Persistent storage in a redb file
//! - [`MemoryEngine`] - For testing and ephemeral storage
//!
//! ## Example
//!
//! ```rust
//! use partikv_engine::{Engine, EngineIter, EngineStore, MemoryEngine, DEFAULT_PARTITION};
//! use std::path::Path;
//!
//! let engine = MemoryEngine::new();
//! engine.create(Path::new("db")).unwrap();
//! let (store, handles) = engine.open(Path::new("db"), &[DEFAULT_PARTITION]).unwrap();
//!
//! store.put(&handles[0], b"a", b"1").unwrap();
//! let mut iter = store.iter(&handles[0]).unwrap();
//! iter.seek(b"").unwrap();
//! assert_eq!(iter.key(), b"a");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod error;
mod memory;
mod redb_engine;

pub use engine::{Engine, EngineIter, EngineStore, PartitionHandle, DEFAULT_PARTITION};
pub use error::{EngineError, EngineResult};
pub use memory::{MemoryEngine, MemoryIter, MemoryPartition, MemoryStore};
pub use redb_engine::{
    RedbConfig, RedbEngine, RedbIter, RedbPartition, RedbStore, DATA_FILE,
    DEFAULT_SCAN_BATCH_SIZE,
};
