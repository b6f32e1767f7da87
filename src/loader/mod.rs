//! Definition loader module
//!
//! Builds paginators for JSON APIs from declarative definitions.
//!
//! # Overview
//!
//! The loader module provides:
//! - `PaginatorDefinition` - Declarative description of a paginated endpoint
//! - YAML/JSON parsing with validation
//! - `build_paginator` - Turns a definition into a ready `Paginator`
//!
//! # Example
//!
//! ```yaml
//! name: issues
//! url: https://api.example.com/issues
//! records_path: data
//! pagination:
//!   type: cursor
//!   cursor_param: after
//!   cursor_path: meta.next_cursor
//! ```

mod paginator;
mod parser;
mod types;

pub use paginator::{build_paginator, client_for, JsonApiRetriever, JsonPage};
pub use parser::{load_definition, load_definition_from_str};
pub use types::{CursorLocation, HttpDefinition, PaginationDefinition, PaginatorDefinition};

#[cfg(test)]
mod tests;
