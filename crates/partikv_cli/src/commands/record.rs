//! Point record commands.

use super::{CommandResult, Target};
use std::io::Write;
use tracing::debug;

/// Stores `value` under `key`.
pub fn put(target: &Target<'_>, key: &str, value: &str) -> CommandResult {
    let (db, partition) = target.open()?;
    db.put(partition, key.as_bytes(), value.as_bytes())?;
    debug!("Stored {} bytes under {:?} in {}", value.len(), key, target.partition);
    Ok(())
}

/// Prints the value under `key`. A missing key is an error.
pub fn get(target: &Target<'_>, key: &str, out: &mut impl Write) -> CommandResult {
    let (db, partition) = target.open()?;
    let value = db
        .get(partition, key.as_bytes())?
        .ok_or_else(|| format!("Key {:?} not found in {}", key, target.partition))?;
    writeln!(out, "{}", String::from_utf8_lossy(&value))?;
    Ok(())
}

/// Removes `key`. Removing a missing key succeeds.
pub fn delete(target: &Target<'_>, key: &str) -> CommandResult {
    let (db, partition) = target.open()?;
    db.delete(partition, key.as_bytes())?;
    Ok(())
}

/// Prints `true` or `false`.
pub fn exists(target: &Target<'_>, key: &str, out: &mut impl Write) -> CommandResult {
    let (db, partition) = target.open()?;
    writeln!(out, "{}", db.exists(partition, key.as_bytes())?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use partikv_core::Database;
    use std::path::Path;
    use tempfile::tempdir;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> CommandResult) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn init(path: &Path, partitions: &[String]) {
        drop(Database::open(path, partitions).unwrap());
    }

    #[test]
    fn put_get_exists_delete() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("db");
        let partitions = vec!["MSG".to_string()];
        init(&path, &partitions);
        let target = Target::new(&path, &partitions, "MSG");

        put(&target, "greeting", "hello").unwrap();
        assert_eq!(output(|out| get(&target, "greeting", out)), "hello\n");
        assert_eq!(output(|out| exists(&target, "greeting", out)), "true\n");

        delete(&target, "greeting").unwrap();
        assert_eq!(output(|out| exists(&target, "greeting", out)), "false\n");
        assert!(get(&target, "greeting", &mut Vec::new()).is_err());
    }

    #[test]
    fn unknown_partition_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("db");
        init(&path, &[]);

        let target = Target::new(&path, &[], "MSG");
        assert!(put(&target, "k", "v").is_err());
    }

    #[test]
    fn record_commands_do_not_create() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("db");

        let target = Target::new(&path, &[], "default");
        assert!(put(&target, "k", "v").is_err());
        assert!(!path.exists());
    }
}
