//! Flatset CLI
//!
//! Command-line tools for flatset store management.
//!
//! # Commands
//!
//! - `add` - Add words to a store
//! - `contains` - Check whether words are in a store
//! - `list` - Print every word in a store
//! - `inspect` - Display store statistics and metadata
//! - `verify` - Verify store integrity

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Flatset command-line store tools.
#[derive(Parser)]
#[command(name = "flatset")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the store file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add words to a store, creating the file if needed
    Add {
        /// Words to add
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Check whether words are in a store
    Contains {
        /// Words to look up
        #[arg(required = true)]
        words: Vec<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print every word in a store, in ascending byte order
    List {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Display store statistics and metadata
    Inspect {
        /// List every record
        #[arg(short, long)]
        records: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Verify store integrity
    Verify,

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
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Add { words } => {
            let path = cli.path.ok_or("Store path required for add")?;
            commands::add::run(&path, &words)?;
        }
        Commands::Contains { words, format } => {
            let path = cli.path.ok_or("Store path required for contains")?;
            commands::contains::run(&path, &words, &format)?;
        }
        Commands::List { format } => {
            let path = cli.path.ok_or("Store path required for list")?;
            commands::list::run(&path, &format)?;
        }
        Commands::Inspect { records, format } => {
            let path = cli.path.ok_or("Store path required for inspect")?;
            commands::inspect::run(&path, records, &format)?;
        }
        Commands::Verify => {
            let path = cli.path.ok_or("Store path required for verify")?;
            commands::verify::run(&path)?;
        }
        Commands::Version => {
            println!("Flatset CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Flatset Core v{}", flatset_core::VERSION);
        }
    }

    Ok(())
}
