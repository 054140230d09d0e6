//! # PartiKV Core
//!
//! Multi-partition key-value store facade for PartiKV.
//!
//! This crate sits in front of an ordered key-value engine and provides:
//! - Bootstrap of a database and its named partitions
//! - A partition registry mapping names to stable indices
//! - Point put/get/delete/exists scoped to a partition
//! - Resumable forward cursors, optionally bounded by a key prefix
//! - A dual-database store separating durable records from a cache
//!
//! ## Example
//!
//! ```rust
//! use partikv_core::{Database, PartitionId};
//!
//! let db = Database::open_in_memory(&["DOT", "MSG"]).unwrap();
//! let msg = db.partition("MSG").unwrap();
//!
//! db.put(msg, b"m1", b"hello").unwrap();
//! assert_eq!(db.get(msg, b"m1").unwrap(), Some(b"hello".to_vec()));
//! assert!(!db.exists(PartitionId::DEFAULT, b"m1").unwrap());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod bootstrap;
mod config;
mod cursor;
mod database;
mod dual;
mod error;
mod partition;
mod store;

pub use bootstrap::{bootstrap, Bootstrapped};
pub use config::{Config, DualConfig};
pub use cursor::{Cursor, CursorState, Entries};
pub use database::Database;
pub use dual::DualStore;
pub use error::{CoreError, CoreResult};
pub use partition::{declared_partitions, PartitionId, PartitionMap, PartitionRegistry};
pub use store::RecordStore;

pub use partikv_engine::{
    Engine, EngineError, EngineIter, EngineStore, MemoryEngine, RedbConfig, RedbEngine,
    DEFAULT_PARTITION,
};

/// PartiKV version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
