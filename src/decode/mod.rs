//! Decode module
//!
//! Turns raw JSON pages into contexts and records.
//!
//! # Overview
//!
//! - [`JsonContextExtractor`] deserializes an [`crate::http::HttpPage`] body
//!   into any `serde` type, for use with a staged paginator
//! - [`JsonRecords`] lists the records at a path in a JSON context
//! - Path helpers read cursors, offsets, and totals out of JSON values

mod json;
mod path;

pub use json::{JsonContextExtractor, JsonRecords};
pub use path::{extract_path, extract_records, extract_string, extract_u64};

#[cfg(test)]
mod tests;
