//! End-to-end checks of the record, cursor and bootstrap guarantees,
//! run against redb on disk.

use partikv_core::{CoreError, Database, DualConfig, DualStore, PartitionId};
use partikv_testkit::prelude::*;
use tempfile::tempdir;

fn keys<I: partikv_core::EngineIter>(cursor: partikv_core::Cursor<I>) -> Vec<Vec<u8>> {
    cursor.into_entries().map(|e| e.unwrap().0).collect()
}

#[test]
fn round_trip() {
    with_file_db(&["MSG"], |db, _| {
        let msg = db.partition("MSG").unwrap();
        db.put(msg, b"k", b"v").unwrap();
        assert_eq!(db.get(msg, b"k").unwrap(), Some(b"v".to_vec()));

        db.put(msg, b"k", b"").unwrap();
        assert_eq!(db.get(msg, b"k").unwrap(), Some(Vec::new()));
    });
}

#[test]
fn absence_is_not_an_error() {
    with_file_db(&[], |db, _| {
        assert_eq!(db.get(PartitionId::DEFAULT, b"never").unwrap(), None);
        assert!(!db.exists(PartitionId::DEFAULT, b"never").unwrap());
    });
}

#[test]
fn delete_is_idempotent() {
    with_file_db(&[], |db, _| {
        let p = PartitionId::DEFAULT;
        db.delete(p, b"absent").unwrap();

        db.put(p, b"k", b"v").unwrap();
        db.delete(p, b"k").unwrap();
        db.delete(p, b"k").unwrap();
        assert!(!db.exists(p, b"k").unwrap());
    });
}

#[test]
fn bootstrap_is_idempotent() {
    let names = ["DOT", "DCHAIN", "MSG", "MSG_I", "ENTITY"];
    let test_db = TestDatabase::new(&names);
    for (i, name) in names.iter().enumerate() {
        let id = test_db.partition(name).unwrap();
        assert_eq!(id, PartitionId::new(i as u32 + 1));
        scenarios::populate(&test_db.db, id, 5);
    }

    let test_db = test_db.reopen().reopen();
    for name in names {
        let id = test_db.partition(name).unwrap();
        for i in 0..5 {
            assert_eq!(
                test_db.get(id, &scenarios::record_key(i)).unwrap(),
                Some(scenarios::record_value(i))
            );
        }
    }
}

#[test]
fn cursor_ordering() {
    with_file_db(&[], |db, _| {
        let p = PartitionId::DEFAULT;
        for key in ["e", "a", "c"] {
            db.put(p, key.as_bytes(), b"").unwrap();
        }

        assert_eq!(keys(db.seek(p, b"b").unwrap()), vec![b"c".to_vec(), b"e".to_vec()]);
        assert!(keys(db.seek(p, b"f").unwrap()).is_empty());
        assert_eq!(keys(db.seek(p, b"").unwrap()).len(), 3);
    });
}

#[test]
fn cursor_sees_snapshot_at_seek() {
    with_file_db(&[], |db, _| {
        let p = PartitionId::DEFAULT;
        db.put(p, b"a", b"1").unwrap();
        let cursor = db.seek(p, b"").unwrap();
        db.put(p, b"b", b"2").unwrap();

        assert_eq!(keys(cursor), vec![b"a".to_vec()]);
    });
}

#[test]
fn partitions_are_isolated() {
    with_file_db(&["DOT", "MSG"], |db, _| {
        let dot = db.partition("DOT").unwrap();
        let msg = db.partition("MSG").unwrap();

        db.put(dot, b"shared", b"dot").unwrap();
        assert_eq!(db.get(msg, b"shared").unwrap(), None);
        assert!(keys(db.seek(msg, b"").unwrap()).is_empty());

        db.put(msg, b"shared", b"msg").unwrap();
        db.delete(dot, b"shared").unwrap();
        assert_eq!(db.get(msg, b"shared").unwrap(), Some(b"msg".to_vec()));
    });
}

#[test]
fn dual_stores_are_isolated() {
    let temp = tempdir().unwrap();
    let config = DualConfig::new(temp.path().join("persist"), temp.path().join("cache"));

    {
        let store = DualStore::open(config.clone()).unwrap();
        store.put_persist(b"k", b"durable").unwrap();
        assert_eq!(store.get_cache(b"k").unwrap(), None);

        store.put_cache(b"k", b"cached").unwrap();
        assert_eq!(store.get_persist(b"k").unwrap(), Some(b"durable".to_vec()));
    }

    let store = DualStore::open(config.discard_cache_on_open(true)).unwrap();
    assert_eq!(store.get_persist(b"k").unwrap(), Some(b"durable".to_vec()));
    assert!(!store.exists_cache(b"k").unwrap());
}

#[test]
fn cache_discard_never_reaches_persist() {
    let temp = tempdir().unwrap();
    let data = temp.path().join("data");
    let persist = data.join("persist");
    DualStore::open(DualConfig::new(&persist, temp.path().join("cache")))
        .unwrap()
        .put_persist(b"k", b"durable")
        .unwrap();

    for config in [
        DualConfig::new(&persist, &data),
        DualConfig::new(&data, &persist),
    ] {
        let err = DualStore::open(config.discard_cache_on_open(true)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { .. }));
    }

    let store = DualStore::open(DualConfig::new(&persist, temp.path().join("cache"))).unwrap();
    assert_eq!(store.get_persist(b"k").unwrap(), Some(b"durable".to_vec()));
}

#[test]
fn shared_across_threads() {
    let test_db = TestDatabase::new(&["MSG"]);
    let msg = test_db.partition("MSG").unwrap();
    let db: &Database = &test_db;

    std::thread::scope(|s| {
        for t in 0..4u8 {
            s.spawn(move || {
                for i in 0..25u8 {
                    db.put(msg, &[t, i], &[i]).unwrap();
                }
            });
        }
    });

    assert_eq!(keys(db.seek(msg, b"").unwrap()).len(), 100);
}
