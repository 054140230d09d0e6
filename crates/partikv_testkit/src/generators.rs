//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random test data
//! that maintains required invariants.

use proptest::prelude::*;

/// Strategy for generating valid (non-empty) keys.
///
/// Keys are drawn from a small alphabet so that random operation
/// sequences revisit the same keys often.
pub fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"abcde".to_vec()), 1..4)
}

/// Strategy for generating arbitrary keys, including bytes that are not
/// valid UTF-8.
pub fn binary_key_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..32)
}

/// Strategy for generating values (arbitrary bytes, possibly empty).
pub fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

/// Strategy for generating valid partition names.
pub fn partition_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][A-Z_]{0,11}").expect("Invalid regex")
}

/// Strategy for generating a list of distinct partition names.
pub fn partition_list_strategy(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(partition_name_strategy(), 0..=max)
        .prop_map(|names| names.into_iter().collect())
}

/// A single record operation.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Put a record
    Put {
        /// Partition index
        partition: u32,
        /// Record key
        key: Vec<u8>,
        /// Record value
        value: Vec<u8>,
    },
    /// Delete a record
    Delete {
        /// Partition index
        partition: u32,
        /// Record key
        key: Vec<u8>,
    },
    /// Get a record
    Get {
        /// Partition index
        partition: u32,
        /// Record key
        key: Vec<u8>,
    },
}

/// Strategy for generating operations over `partitions` partitions.
pub fn operation_strategy(partitions: u32) -> impl Strategy<Value = Operation> {
    let partition = 0..partitions.max(1);
    prop_oneof![
        3 => (partition.clone(), key_strategy(), value_strategy())
            .prop_map(|(partition, key, value)| Operation::Put { partition, key, value }),
        1 => (partition.clone(), key_strategy())
            .prop_map(|(partition, key)| Operation::Delete { partition, key }),
        2 => (partition, key_strategy())
            .prop_map(|(partition, key)| Operation::Get { partition, key }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    partitions: u32,
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(operation_strategy(partitions), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
