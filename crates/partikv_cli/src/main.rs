//! PartiKV CLI
//!
//! Command-line tools for inspecting and editing PartiKV databases.
//!
//! # Commands
//!
//! - `init` - Create a database and its partitions
//! - `partitions` - List partitions and their indices
//! - `put` / `get` / `delete` / `exists` - Point operations on one partition
//! - `scan` - Walk a partition in key order

mod commands;

use clap::{Parser, Subcommand};
use partikv_core::DEFAULT_PARTITION;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// PartiKV command-line database tools.
#[derive(Parser)]
#[command(name = "partikv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the database directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Application partitions, comma separated, in index order
    #[arg(global = true, long, value_delimiter = ',')]
    partitions: Vec<String>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and any missing partitions
    Init,

    /// List partitions and their indices
    Partitions {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Store a value
    Put {
        /// Target partition
        #[arg(long, default_value = DEFAULT_PARTITION)]
        partition: String,

        /// Record key
        key: String,

        /// Record value
        value: String,
    },

    /// Print a stored value
    Get {
        /// Target partition
        #[arg(long, default_value = DEFAULT_PARTITION)]
        partition: String,

        /// Record key
        key: String,
    },

    /// Remove a key
    Delete {
        /// Target partition
        #[arg(long, default_value = DEFAULT_PARTITION)]
        partition: String,

        /// Record key
        key: String,
    },

    /// Print whether a key is present
    Exists {
        /// Target partition
        #[arg(long, default_value = DEFAULT_PARTITION)]
        partition: String,

        /// Record key
        key: String,
    },

    /// List records in key order
    Scan {
        /// Target partition
        #[arg(long, default_value = DEFAULT_PARTITION)]
        partition: String,

        /// Start at the first key greater than or equal to this one
        #[arg(short, long, conflicts_with = "prefix")]
        start: Option<String>,

        /// Only list keys starting with this prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Maximum number of records to list
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins when set
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut out = io::stdout().lock();
    let partitions = cli.partitions;

    match cli.command {
        Commands::Init => {
            let path = cli.path.ok_or("Database path required for init")?;
            commands::init::run(&path, &partitions, &mut out)?;
        }
        Commands::Partitions { format } => {
            let path = cli.path.ok_or("Database path required for partitions")?;
            commands::partitions::run(&path, &partitions, &format, &mut out)?;
        }
        Commands::Put {
            partition,
            key,
            value,
        } => {
            let path = cli.path.ok_or("Database path required for put")?;
            let target = commands::Target::new(&path, &partitions, &partition);
            commands::record::put(&target, &key, &value)?;
        }
        Commands::Get { partition, key } => {
            let path = cli.path.ok_or("Database path required for get")?;
            let target = commands::Target::new(&path, &partitions, &partition);
            commands::record::get(&target, &key, &mut out)?;
        }
        Commands::Delete { partition, key } => {
            let path = cli.path.ok_or("Database path required for delete")?;
            let target = commands::Target::new(&path, &partitions, &partition);
            commands::record::delete(&target, &key)?;
        }
        Commands::Exists { partition, key } => {
            let path = cli.path.ok_or("Database path required for exists")?;
            let target = commands::Target::new(&path, &partitions, &partition);
            commands::record::exists(&target, &key, &mut out)?;
        }
        Commands::Scan {
            partition,
            start,
            prefix,
            limit,
            format,
        } => {
            let path = cli.path.ok_or("Database path required for scan")?;
            let target = commands::Target::new(&path, &partitions, &partition);
            let range = match prefix {
                Some(prefix) => commands::scan::Range::Prefix(prefix),
                None => commands::scan::Range::From(start.unwrap_or_default()),
            };
            commands::scan::run(&target, &range, limit, &format, &mut out)?;
        }
        Commands::Version => {
            writeln!(out, "PartiKV CLI v{}", env!("CARGO_PKG_VERSION"))?;
            writeln!(out, "PartiKV Core v{}", partikv_core::VERSION)?;
        }
    }

    Ok(())
}
