//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Walk paginated JSON APIs from the command line
#[derive(Parser, Debug)]
#[command(name = "pagewalk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream every item of a paginated endpoint to stdout
    Fetch {
        /// Paginator definition file (YAML or JSON)
        #[arg(short, long)]
        definition: PathBuf,

        /// Stop after this many items
        #[arg(long)]
        max_items: Option<usize>,
    },

    /// Validate a paginator definition
    Validate {
        /// Paginator definition file (YAML or JSON)
        #[arg(short, long)]
        definition: PathBuf,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON document per line
    Json,
    /// Indented JSON
    Pretty,
}
