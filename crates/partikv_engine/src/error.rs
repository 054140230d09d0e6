//! Error types for engine operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors reported by an engine.
///
/// There is no "key not found" variant: point lookups report absence as
/// `Ok(None)`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The underlying engine reported an error.
    #[error("engine error during {context}: {message}")]
    Backend {
        /// The operation that failed.
        context: &'static str,
        /// The engine's description of the failure.
        message: String,
    },

    /// No database exists at the given path.
    #[error("database does not exist: {}", .path.display())]
    MissingDatabase {
        /// The path that was opened.
        path: PathBuf,
    },

    /// The database exists but lacks a required partition.
    #[error("partition does not exist: {name}")]
    MissingPartition {
        /// Name of the missing partition.
        name: String,
    },

    /// A partition with this name already exists.
    #[error("partition already exists: {name}")]
    PartitionExists {
        /// Name of the existing partition.
        name: String,
    },
}

impl EngineError {
    /// Creates a backend error from any displayable engine error.
    pub fn backend(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Backend {
            context,
            message: err.to_string(),
        }
    }

    /// Returns true if this error means the database or one of its
    /// partitions is absent, as opposed to a fault inside the engine.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            Self::MissingDatabase { .. } | Self::MissingPartition { .. }
        )
    }
}
