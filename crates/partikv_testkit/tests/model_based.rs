//! Model-based property tests: random operation sequences are applied to
//! a database and to a `BTreeMap`, and the two must agree.

use partikv_core::PartitionId;
use partikv_testkit::prelude::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn memory_database_matches_model(ops in operation_sequence_strategy(3, 1, 64)) {
        let db = memory_db(&["DOT", "MSG"]);
        let mut harness = ModelHarness::new(&db);
        for op in &ops {
            harness.apply(op);
        }
        harness.verify_all();
    }

    #[test]
    fn redb_database_matches_model(ops in operation_sequence_strategy(2, 1, 32)) {
        let test_db = TestDatabase::new(&["MSG"]);
        let mut harness = ModelHarness::new(&test_db.db);
        for op in &ops {
            harness.apply(op);
        }
        harness.verify_all();
    }

    #[test]
    fn seek_matches_model_range(
        keys in prop::collection::vec(binary_key_strategy(), 0..40),
        start in prop::collection::vec(any::<u8>(), 0..8),
    ) {
        let db = memory_db(&[]);
        let mut harness = ModelHarness::new(&db);
        for key in &keys {
            harness.put(PartitionId::DEFAULT, key, b"");
        }
        harness.verify_seek(PartitionId::DEFAULT, &start);
    }

    #[test]
    fn prefix_scan_returns_exactly_matching_keys(
        keys in prop::collection::vec(key_strategy(), 0..40),
        prefix in key_strategy(),
    ) {
        let db = memory_db(&[]);
        for key in &keys {
            db.put(PartitionId::DEFAULT, key, key).unwrap();
        }

        let scanned: Vec<Vec<u8>> = db
            .seek_prefix(PartitionId::DEFAULT, &prefix)
            .unwrap()
            .into_entries()
            .map(|e| e.unwrap().0)
            .collect();

        let mut expected: Vec<Vec<u8>> =
            keys.iter().filter(|k| k.starts_with(&prefix)).cloned().collect();
        expected.sort();
        expected.dedup();
        prop_assert_eq!(scanned, expected);
    }
}
