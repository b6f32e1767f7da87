//! CLI module
//!
//! Command-line interface for walking paginated JSON APIs.
//!
//! # Commands
//!
//! - `fetch` - Stream every item of a definition to stdout, one JSON per line
//! - `validate` - Check a definition without fetching anything

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
