//! Partitions command implementation.

use super::{open_existing, CommandResult};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// One row of the partition listing.
#[derive(Debug, Serialize)]
pub struct PartitionInfo {
    /// Partition index.
    pub id: u32,
    /// Partition name.
    pub name: String,
}

/// Runs the partitions command.
pub fn run(
    path: &Path,
    partitions: &[String],
    format: &str,
    out: &mut impl Write,
) -> CommandResult {
    let db = open_existing(path, partitions)?;
    let rows: Vec<PartitionInfo> = db
        .partitions()
        .iter()
        .map(|(id, name)| PartitionInfo {
            id: id.as_u32(),
            name: name.to_string(),
        })
        .collect();

    match format {
        "json" => writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?,
        _ => {
            for row in &rows {
                writeln!(out, "{:>3}  {}", row.id, row.name)?;
            }
        }
    }

    Ok(())
}
