//! Execution engine module
//!
//! Turns a set of pagination strategies into one lazy item stream.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Paginator` - A configured engine; every call to [`Paginator::items`]
//!   starts an independent traversal
//! - `PaginatorBuilder` - Validated assembly of a `Paginator`
//! - `ItemStream` - The lazy, cancellable stream a traversal produces
//!
//! # Traversal
//!
//! ```text
//! context := NoPriorPage
//! loop:
//!     if context is a page and not has_next(context): stop
//!     context := fetch(context)
//!     for item in extract_items(context):
//!         check cancellation
//!         yield item
//! ```
//!
//! The first page is always fetched. Every item of a page is yielded before
//! the termination predicate is consulted again, and nothing beyond the page
//! the consumer is reading from is ever fetched.

mod builder;
mod traversal;

pub use builder::PaginatorBuilder;

use crate::error::Result;
use crate::pagination::{ItemExtractor, PageRetriever, TerminationPredicate};
use futures::{Stream, TryStreamExt};
use std::pin::Pin;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use traversal::Traversal;

/// Lazy stream of items produced by one traversal
///
/// Ends after the last item, or after yielding the error that aborted the
/// traversal. Cancellation surfaces as [`crate::Error::Cancelled`].
pub type ItemStream<T> = Pin<Box<dyn Stream<Item = Result<T>> + Send>>;

/// A configured pagination engine
///
/// Holds the strategies only. Traversal state lives in the stream returned by
/// [`Paginator::items`], so one paginator can drive any number of
/// traversals, sequentially or at the same time.
pub struct Paginator<C, T> {
    retriever: Arc<dyn PageRetriever<C>>,
    predicate: Arc<dyn TerminationPredicate<C>>,
    extractor: Arc<dyn ItemExtractor<C, T>>,
}

impl<C, T> Clone for Paginator<C, T> {
    fn clone(&self) -> Self {
        Self {
            retriever: Arc::clone(&self.retriever),
            predicate: Arc::clone(&self.predicate),
            extractor: Arc::clone(&self.extractor),
        }
    }
}

impl<C, T> std::fmt::Debug for Paginator<C, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator").finish_non_exhaustive()
    }
}

impl<C, T> Paginator<C, T>
where
    C: Send + Sync + 'static,
    T: Send + 'static,
{
    /// Compose a paginator directly from its three strategies
    pub fn new(
        retriever: impl PageRetriever<C> + 'static,
        predicate: impl TerminationPredicate<C> + 'static,
        extractor: impl ItemExtractor<C, T> + 'static,
    ) -> Self {
        Self {
            retriever: Arc::new(retriever),
            predicate: Arc::new(predicate),
            extractor: Arc::new(extractor),
        }
    }

    /// Start building a paginator whose retriever returns contexts
    pub fn builder() -> PaginatorBuilder<C, T> {
        PaginatorBuilder::new()
    }

    /// Start building a paginator whose retriever returns raw pages of type `P`
    ///
    /// A context extractor is required to turn each `P` into a context.
    pub fn staged_builder<P: Send + 'static>() -> PaginatorBuilder<C, T, P> {
        PaginatorBuilder::staged()
    }

    /// Start a traversal
    ///
    /// Nothing is fetched until the stream is polled. Cancelling `cancel`
    /// ends the traversal with [`crate::Error::Cancelled`] at the next item or
    /// before the next fetch, whichever comes first.
    pub fn items(&self, cancel: CancellationToken) -> ItemStream<T> {
        let traversal = Traversal::new(self.clone(), cancel);
        Box::pin(futures::stream::unfold(
            traversal,
            |mut traversal| async move {
                let item = traversal.next_item().await?;
                Some((item, traversal))
            },
        ))
    }

    /// Start a traversal that is never cancelled
    pub fn all_items(&self) -> ItemStream<T> {
        self.items(CancellationToken::new())
    }

    /// Run a traversal to completion and collect every item
    pub async fn collect_items(&self, cancel: CancellationToken) -> Result<Vec<T>> {
        self.items(cancel).try_collect().await
    }
}
