//! Strategy contracts
//!
//! The engine is assembled from these traits. A page retriever produces a
//! context per page, a termination predicate decides whether another page is
//! needed, and an item extractor lists the page's items. Cursor and offset
//! extractors are narrower ways to supply the termination decision.

use super::types::{Cursor, OffsetState, PriorContext};
use crate::error::Result;
use async_trait::async_trait;
use std::marker::PhantomData;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Retrieval
// ============================================================================

/// Fetches one page given what is known about the previous one
///
/// `P` is what the retriever naturally returns. It defaults to the context
/// type; retrievers that return a raw transport payload pair with a
/// [`ContextExtractor`].
#[async_trait]
pub trait PageRetriever<C, P = C>: Send + Sync {
    /// Fetch the page following `prior`
    async fn fetch(&self, prior: &PriorContext<C>, cancel: &CancellationToken) -> Result<P>;
}

/// Turns a raw page into the context the other strategies consume
#[async_trait]
pub trait ContextExtractor<P, C>: Send + Sync {
    /// Build the context for a freshly fetched page
    async fn extract_context(&self, page: P, cancel: &CancellationToken) -> Result<C>;
}

/// Context extractor for retrievers that already return the context
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityContext;

#[async_trait]
impl<C: Send + 'static> ContextExtractor<C, C> for IdentityContext {
    async fn extract_context(&self, page: C, _cancel: &CancellationToken) -> Result<C> {
        Ok(page)
    }
}

// ============================================================================
// Item Extraction
// ============================================================================

/// Lists the items of one page, in page order
#[async_trait]
pub trait ItemExtractor<C, T>: Send + Sync {
    /// Extract the items carried by `context`
    async fn extract_items(&self, context: &C, cancel: &CancellationToken) -> Result<Vec<T>>;
}

// ============================================================================
// Termination
// ============================================================================

/// Decides whether another page should be fetched after `context`
#[async_trait]
pub trait TerminationPredicate<C>: Send + Sync {
    /// Check whether a next page exists
    async fn has_next(&self, context: &C, cancel: &CancellationToken) -> Result<bool>;
}

/// Reads the continuation cursor out of a context
///
/// `None` means the source has no further pages.
#[async_trait]
pub trait CursorExtractor<C, K = Cursor>: Send + Sync {
    /// Extract the cursor, if present
    async fn extract_cursor(&self, context: &C, cancel: &CancellationToken)
        -> Result<Option<K>>;
}

/// Reads the offset/total pair out of a context
#[async_trait]
pub trait OffsetStateExtractor<C, I = usize>: Send + Sync {
    /// Extract the offset state as of this page
    async fn extract_offset_state(
        &self,
        context: &C,
        cancel: &CancellationToken,
    ) -> Result<OffsetState<I>>;
}

// ============================================================================
// Cursor-Presence Policy
// ============================================================================

/// Termination policy: continue while the context still carries a cursor
///
/// A source that only notices it is exhausted when asked for the page after
/// the last one costs one trailing fetch that yields no items.
pub struct CursorPresence<X, K = Cursor> {
    extractor: X,
    _cursor: PhantomData<fn() -> K>,
}

impl<X, K> CursorPresence<X, K> {
    /// Wrap a cursor extractor
    pub fn new(extractor: X) -> Self {
        Self {
            extractor,
            _cursor: PhantomData,
        }
    }

    /// Get the wrapped extractor
    pub fn extractor(&self) -> &X {
        &self.extractor
    }
}

impl<X: std::fmt::Debug, K> std::fmt::Debug for CursorPresence<X, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorPresence")
            .field("extractor", &self.extractor)
            .finish()
    }
}

#[async_trait]
impl<C, K, X> TerminationPredicate<C> for CursorPresence<X, K>
where
    C: Sync + 'static,
    K: Send + 'static,
    X: CursorExtractor<C, K> + 'static,
{
    async fn has_next(&self, context: &C, cancel: &CancellationToken) -> Result<bool> {
        let cursor = self.extractor.extract_cursor(context, cancel).await?;
        Ok(cursor.is_some())
    }
}

// ============================================================================
// Offset/Total Policy
// ============================================================================

/// Termination policy: continue while `offset < total`
pub struct OffsetTotal<X, I = usize> {
    extractor: X,
    _index: PhantomData<fn() -> I>,
}

impl<X, I> OffsetTotal<X, I> {
    /// Wrap an offset state extractor
    pub fn new(extractor: X) -> Self {
        Self {
            extractor,
            _index: PhantomData,
        }
    }

    /// Get the wrapped extractor
    pub fn extractor(&self) -> &X {
        &self.extractor
    }
}

impl<X: std::fmt::Debug, I> std::fmt::Debug for OffsetTotal<X, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffsetTotal")
            .field("extractor", &self.extractor)
            .finish()
    }
}

#[async_trait]
impl<C, I, X> TerminationPredicate<C> for OffsetTotal<X, I>
where
    C: Sync + 'static,
    I: PartialOrd + Send + 'static,
    X: OffsetStateExtractor<C, I> + 'static,
{
    async fn has_next(&self, context: &C, cancel: &CancellationToken) -> Result<bool> {
        let state = self.extractor.extract_offset_state(context, cancel).await?;
        Ok(state.has_more())
    }
}
