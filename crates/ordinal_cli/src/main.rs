//! Ordinal CLI
//!
//! Command-line tools for inspecting and maintaining ordered collections
//! in an Ordinal SQLite database.
//!
//! # Commands
//!
//! - `init` - Create the table of every collection
//! - `list` - Show a collection in display order
//! - `insert` / `delete` - Add a row at the tail, or remove one
//! - `move` / `batch` - Move rows, resolving collisions
//! - `compact` / `reorder` - Renumber positions to `1..=N`
//! - `validate` - Check for duplicate positions
//! - `stats` - Show the shape of each ordering

mod commands;

use clap::{Parser, Subcommand};
use commands::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ordinal command-line ordering tools.
#[derive(Parser)]
#[command(name = "ordinal")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(global = true, short, long)]
    db: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Output format
    #[arg(global = true, short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the table of every collection
    Init,

    /// Show a collection in display order
    List {
        /// Collection name
        collection: String,
    },

    /// Show the position the next inserted row would get
    Next {
        /// Collection name
        collection: String,
    },

    /// Append a row to a collection
    Insert {
        /// Collection name
        collection: String,

        /// Business attributes as a JSON object
        #[arg(short, long)]
        attributes: Option<String>,
    },

    /// Delete a row (survivors keep their positions)
    Delete {
        /// Collection name
        collection: String,

        /// Row id
        id: String,
    },

    /// Move a row to a position
    Move {
        /// Collection name
        collection: String,

        /// Row id
        id: String,

        /// Target position
        #[arg(allow_hyphen_values = true)]
        position: String,
    },

    /// Apply a JSON file of moves in order
    Batch {
        /// Collection name
        collection: String,

        /// File holding `[{"id": ..., "position": ...}, ...]`
        file: PathBuf,
    },

    /// Renumber positions to close gaps
    Compact {
        /// Collection name (all collections if omitted)
        collection: Option<String>,
    },

    /// Repair duplicate positions
    Reorder {
        /// Collection name (all collections if omitted)
        collection: Option<String>,
    },

    /// Check for duplicate positions
    Validate {
        /// Collection name (all collections if omitted)
        collection: Option<String>,
    },

    /// Show ordering statistics
    Stats {
        /// Collection name (all collections if omitted)
        collection: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Version = cli.command {
        println!("Ordinal CLI v{}", env!("CARGO_PKG_VERSION"));
        println!("Ordinal Core v{}", ordinal_core::VERSION);
        return Ok(());
    }

    let path = cli.db.ok_or("Database path required (--db)")?;
    let engine = commands::open_engine(&path)?;
    let format = cli.format;

    match cli.command {
        Commands::Init => commands::init::run(&engine, format)?,
        Commands::List { collection } => commands::list::run(&engine, &collection, format)?,
        Commands::Next { collection } => commands::next::run(&engine, &collection, format)?,
        Commands::Insert {
            collection,
            attributes,
        } => commands::insert::run(&engine, &collection, attributes.as_deref(), format)?,
        Commands::Delete { collection, id } => {
            commands::delete::run(&engine, &collection, &id, format)?;
        }
        Commands::Move {
            collection,
            id,
            position,
        } => commands::moves::run_move(&engine, &collection, &id, &position, format)?,
        Commands::Batch { collection, file } => {
            commands::moves::run_batch(&engine, &collection, &file, format)?;
        }
        Commands::Compact { collection } => {
            commands::renumber::run(&engine, collection.as_deref(), commands::renumber::Mode::Compact, format)?;
        }
        Commands::Reorder { collection } => {
            commands::renumber::run(&engine, collection.as_deref(), commands::renumber::Mode::Reorder, format)?;
        }
        Commands::Validate { collection } => {
            commands::validate::run(&engine, collection.as_deref(), format)?;
        }
        Commands::Stats { collection } => {
            commands::stats::run(&engine, collection.as_deref(), format)?;
        }
        Commands::Version => {}
    }

    Ok(())
}
