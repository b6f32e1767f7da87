//! Pagination module
//!
//! Strategy contracts and value types for sequential pagination.
//!
//! # Overview
//!
//! A paginated source is described by three strategies:
//!
//! - a [`PageRetriever`] that fetches the page after a [`PriorContext`],
//! - a termination source that decides whether another page exists, supplied
//!   either directly as a [`TerminationPredicate`], or derived from a
//!   [`CursorExtractor`] ([`CursorPresence`]) or an [`OffsetStateExtractor`]
//!   ([`OffsetTotal`]),
//! - an [`ItemExtractor`] that lists the items of a page.
//!
//! Retrievers that return a raw payload pair with a [`ContextExtractor`].
//! Closures become strategies through [`FromFn`] and [`FromAsyncFn`].

mod adapters;
mod strategies;
mod types;

pub use adapters::{FromAsyncFn, FromFn};
pub use strategies::{
    ContextExtractor, CursorExtractor, CursorPresence, IdentityContext, ItemExtractor,
    OffsetStateExtractor, OffsetTotal, PageRetriever, TerminationPredicate,
};
pub use types::{Cursor, OffsetState, PriorContext};
