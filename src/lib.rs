// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pagewalk
//!
//! A lazy, cancellable traversal engine for paginated APIs.
//!
//! A paginator is assembled from four small strategies: a page retriever, a
//! context extractor, a termination predicate and an item extractor. The
//! resulting [`Paginator`] turns them into a flat, pull-driven stream of items
//! that fetches a page only when the consumer asks for more.
//!
//! ## Features
//!
//! - **Lazy**: nothing is fetched until the stream is polled
//! - **Cancellable**: every traversal honours a `CancellationToken`
//! - **Pluggable termination**: cursor presence, offset/total, or any predicate
//! - **HTTP plumbing**: retrying client with rate limiting and `Link` headers
//! - **Declarative**: YAML/JSON paginator definitions for common JSON APIs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use pagewalk::{Paginator, Result};
//! use tokio_util::sync::CancellationToken;
//!
//! async fn run() -> Result<()> {
//!     let paginator: Paginator<Page, Item> = Paginator::builder()
//!         .page_retriever_async(|prior, _cancel| fetch_page(prior.clone()))
//!         .cursor_extractor_fn(|page: &Page| Ok(page.next.clone()))
//!         .item_extractor_fn(|page: &Page| Ok(page.items.clone()))
//!         .build()?;
//!
//!     let mut items = paginator.items(CancellationToken::new());
//!     while let Some(item) = items.next().await {
//!         println!("{:?}", item?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           Paginator                             │
//! │      items(cancel) → Stream<Item>     collect_items(cancel)     │
//! └─────────────────────────────────────────────────────────────────┘
//!                                 │
//! ┌───────────────┬───────────────┴───────────────┬─────────────────┐
//! │   Retrieve    │  Context      │  Terminate    │  Extract        │
//! ├───────────────┼───────────────┼───────────────┼─────────────────┤
//! │ HttpClient    │ Identity      │ Cursor        │ JsonRecords     │
//! │ Retry/Backoff │ JsonContext   │ Offset/Total  │ closures        │
//! │ Rate Limit    │ closures      │ Predicate     │                 │
//! └───────────────┴───────────────┴───────────────┴─────────────────┘
//!                                 │
//!              loader: YAML definitions → Paginator<JsonPage, Value>
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Strategy contracts and termination policies
pub mod pagination;

/// Lazy traversal engine
pub mod engine;

/// HTTP client with retry and rate limiting
pub mod http;

/// JSON page decoding and path extraction
pub mod decode;

/// Declarative paginator definitions
pub mod loader;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use engine::{ItemStream, Paginator, PaginatorBuilder};
pub use error::{Error, ErrorKind, Result, ResultExt};
pub use pagination::{
    ContextExtractor, Cursor, CursorExtractor, ItemExtractor, OffsetState, OffsetStateExtractor,
    PageRetriever, PriorContext, TerminationPredicate,
};
pub use types::*;

// Re-export commonly used types
pub use loader::{build_paginator, load_definition, load_definition_from_str, PaginatorDefinition};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
