//! # PartiKV Testkit
//!
//! Test utilities for PartiKV.
//!
//! This crate provides:
//! - Test fixtures for in-memory and on-disk databases
//! - Property-based test generators using proptest
//! - A reference-model harness that checks a database against a `BTreeMap`
//!
//! ## Usage
//!
//! ```rust
//! use partikv_testkit::prelude::*;
//!
//! with_temp_db(&["MSG"], |db| {
//!     let msg = db.partition("MSG").unwrap();
//!     db.put(msg, b"k", b"v").unwrap();
//!     assert!(db.exists(msg, b"k").unwrap());
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod model;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::model::*;
}

pub use fixtures::*;
pub use generators::*;
pub use model::*;
