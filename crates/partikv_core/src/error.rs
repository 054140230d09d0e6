//! Error types for PartiKV core.

use crate::partition::PartitionId;
use partikv_engine::EngineError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in PartiKV core operations.
///
/// A missing key is not an error: `get` returns `None` and `exists`
/// returns `false`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Engine error during a record or cursor operation.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The database could not be opened or created with its partitions.
    #[error("bootstrap failed for {}: {source}", .path.display())]
    Bootstrap {
        /// The database path.
        path: PathBuf,
        /// The engine error from the last attempt.
        #[source]
        source: EngineError,
    },

    /// A partition index outside the registry.
    #[error("unknown partition {id} (database has {count} partitions)")]
    UnknownPartition {
        /// The requested index.
        id: PartitionId,
        /// Number of registered partitions.
        count: usize,
    },

    /// A partition name that was not declared at bootstrap.
    #[error("unknown partition name: {name}")]
    UnknownPartitionName {
        /// The requested name.
        name: String,
    },

    /// A partition name that cannot be declared.
    #[error("invalid partition name {name:?}: {reason}")]
    InvalidPartitionName {
        /// The offending name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Keys must not be empty.
    #[error("key must not be empty")]
    EmptyKey,

    /// Configuration is inconsistent.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },
}

impl CoreError {
    /// Creates a bootstrap error.
    pub fn bootstrap(path: &Path, source: EngineError) -> Self {
        Self::Bootstrap {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates an invalid partition name error.
    pub fn invalid_partition_name(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidPartitionName {
            name: name.into(),
            reason,
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns true for errors caused by the caller rather than the engine:
    /// unknown partitions, invalid names and empty keys.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::UnknownPartition { .. }
                | Self::UnknownPartitionName { .. }
                | Self::InvalidPartitionName { .. }
                | Self::EmptyKey
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn bootstrap_error_keeps_source() {
        let err = CoreError::bootstrap(
            Path::new("/data/db"),
            EngineError::MissingPartition { name: "MSG".into() },
        );
        assert_eq!(
            err.to_string(),
            "bootstrap failed for /data/db: partition does not exist: MSG"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn contract_violations() {
        assert!(CoreError::EmptyKey.is_contract_violation());
        assert!(CoreError::UnknownPartition {
            id: PartitionId::new(9),
            count: 2
        }
        .is_contract_violation());
        assert!(!CoreError::invalid_config("x").is_contract_violation());
    }

    #[test]
    fn unknown_partition_message() {
        let err = CoreError::UnknownPartition {
            id: PartitionId::new(7),
            count: 3,
        };
        assert_eq!(
            err.to_string(),
            "unknown partition part:7 (database has 3 partitions)"
        );
    }
}
