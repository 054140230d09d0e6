//! Init command implementation.

use super::CommandResult;
use partikv_core::Database;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Runs the init command: bootstraps the database and lists its partitions.
pub fn run(path: &Path, partitions: &[String], out: &mut impl Write) -> CommandResult {
    info!("Initializing database at {:?}", path);
    let db = Database::open(path, partitions)?;

    writeln!(out, "Database ready at {}", path.display())?;
    for (id, name) in db.partitions().iter() {
        writeln!(out, "  {:>3}  {}", id.as_u32(), name)?;
    }

    db.close()?;
    Ok(())
}
