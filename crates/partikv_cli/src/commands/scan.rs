//! Scan command implementation.

use super::{CommandResult, Target};
use serde::Serialize;
use std::io::Write;

/// Which keys a scan visits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Range {
    /// Every key greater than or equal to the given one.
    From(String),
    /// Every key starting with the given prefix.
    Prefix(String),
}

/// One scanned record.
#[derive(Debug, Serialize)]
pub struct ScanEntry {
    /// Record key, lossily decoded as UTF-8.
    pub key: String,
    /// Record value, lossily decoded as UTF-8.
    pub value: String,
}

/// Runs the scan command.
pub fn run(
    target: &Target<'_>,
    range: &Range,
    limit: Option<usize>,
    format: &str,
    out: &mut impl Write,
) -> CommandResult {
    let (db, partition) = target.open()?;
    let cursor = match range {
        Range::From(start) => db.seek(partition, start.as_bytes())?,
        Range::Prefix(prefix) => db.seek_prefix(partition, prefix.as_bytes())?,
    };

    let mut entries = Vec::new();
    for entry in cursor.into_entries().take(limit.unwrap_or(usize::MAX)) {
        let (key, value) = entry?;
        entries.push(ScanEntry {
            key: String::from_utf8_lossy(&key).into_owned(),
            value: String::from_utf8_lossy(&value).into_owned(),
        });
    }

    match format {
        "json" => writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?,
        _ => {
            for entry in &entries {
                writeln!(out, "{}\t{}", entry.key, entry.value)?;
            }
        }
    }

    Ok(())
}
