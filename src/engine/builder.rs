//! Paginator builder
//!
//! Collects strategies one setter at a time and validates the combination in
//! [`PaginatorBuilder::build`].

use super::Paginator;
use crate::error::{Error, Result};
use crate::pagination::{
    ContextExtractor, CursorExtractor, CursorPresence, FromAsyncFn, FromFn, IdentityContext,
    ItemExtractor, OffsetState, OffsetStateExtractor, OffsetTotal, PageRetriever, PriorContext,
    TerminationPredicate,
};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Builder for [`Paginator`]
///
/// `P` is the type the page retriever returns. With [`Paginator::builder`] it
/// equals the context type and no context extractor is needed. With
/// [`Paginator::staged_builder`] a context extractor must be supplied.
///
/// Exactly one termination source is accepted: a termination predicate, a
/// cursor extractor, or an offset state extractor.
pub struct PaginatorBuilder<C, T, P = C> {
    retriever: Option<Arc<dyn PageRetriever<C, P>>>,
    context_extractor: Option<Arc<dyn ContextExtractor<P, C>>>,
    termination: Option<(&'static str, Arc<dyn TerminationPredicate<C>>)>,
    item_extractor: Option<Arc<dyn ItemExtractor<C, T>>>,
    conflict: Option<(&'static str, &'static str)>,
}

impl<C, T> PaginatorBuilder<C, T>
where
    C: Send + Sync + 'static,
    T: Send + 'static,
{
    /// Create a builder whose retriever returns contexts directly
    pub fn new() -> Self {
        Self {
            retriever: None,
            context_extractor: Some(Arc::new(IdentityContext)),
            termination: None,
            item_extractor: None,
            conflict: None,
        }
    }
}

impl<C, T> Default for PaginatorBuilder<C, T>
where
    C: Send + Sync + 'static,
    T: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C, T, P> std::fmt::Debug for PaginatorBuilder<C, T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatorBuilder")
            .field("page_retriever", &self.retriever.is_some())
            .field("context_extractor", &self.context_extractor.is_some())
            .field("termination", &self.termination.as_ref().map(|(s, _)| *s))
            .field("item_extractor", &self.item_extractor.is_some())
            .finish()
    }
}

impl<C, T, P> PaginatorBuilder<C, T, P>
where
    C: Send + Sync + 'static,
    T: Send + 'static,
    P: Send + 'static,
{
    /// Create a builder that requires a context extractor
    pub fn staged() -> Self {
        Self {
            retriever: None,
            context_extractor: None,
            termination: None,
            item_extractor: None,
            conflict: None,
        }
    }

    // ========================================================================
    // Retrieval
    // ========================================================================

    /// Set the page retriever
    #[must_use]
    pub fn page_retriever(mut self, retriever: impl PageRetriever<C, P> + 'static) -> Self {
        self.retriever = Some(Arc::new(retriever));
        self
    }

    /// Set the page retriever from a closure
    #[must_use]
    pub fn page_retriever_fn<F>(self, f: F) -> Self
    where
        F: Fn(&PriorContext<C>) -> Result<P> + Send + Sync + 'static,
    {
        self.page_retriever(FromFn(f))
    }

    /// Set the page retriever from an async closure
    #[must_use]
    pub fn page_retriever_async<F, Fut>(self, f: F) -> Self
    where
        F: Fn(&PriorContext<C>, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<P>> + Send + 'static,
    {
        self.page_retriever(FromAsyncFn(f))
    }

    /// Set the context extractor
    #[must_use]
    pub fn context_extractor(mut self, extractor: impl ContextExtractor<P, C> + 'static) -> Self {
        self.context_extractor = Some(Arc::new(extractor));
        self
    }

    /// Set the context extractor from a closure
    #[must_use]
    pub fn context_extractor_fn<F>(self, f: F) -> Self
    where
        F: Fn(P) -> Result<C> + Send + Sync + 'static,
    {
        self.context_extractor(FromFn(f))
    }

    // ========================================================================
    // Termination
    // ========================================================================

    /// Set the termination predicate
    #[must_use]
    pub fn termination_predicate(
        self,
        predicate: impl TerminationPredicate<C> + 'static,
    ) -> Self {
        self.set_termination("termination_predicate", Arc::new(predicate))
    }

    /// Set the termination predicate from a closure
    #[must_use]
    pub fn termination_predicate_fn<F>(self, f: F) -> Self
    where
        F: Fn(&C) -> Result<bool> + Send + Sync + 'static,
    {
        self.termination_predicate(FromFn(f))
    }

    /// Terminate once the context no longer carries a cursor
    #[must_use]
    pub fn cursor_extractor<K, X>(self, extractor: X) -> Self
    where
        K: Send + 'static,
        X: CursorExtractor<C, K> + 'static,
    {
        self.set_termination(
            "cursor_extractor",
            Arc::new(CursorPresence::<X, K>::new(extractor)),
        )
    }

    /// Terminate once the cursor returned by a closure is `None`
    #[must_use]
    pub fn cursor_extractor_fn<K, F>(self, f: F) -> Self
    where
        K: Send + 'static,
        F: Fn(&C) -> Result<Option<K>> + Send + Sync + 'static,
    {
        self.cursor_extractor::<K, _>(FromFn(f))
    }

    /// Terminate once the offset reaches the total
    #[must_use]
    pub fn offset_state_extractor<I, X>(self, extractor: X) -> Self
    where
        I: PartialOrd + Send + 'static,
        X: OffsetStateExtractor<C, I> + 'static,
    {
        self.set_termination(
            "offset_state_extractor",
            Arc::new(OffsetTotal::<X, I>::new(extractor)),
        )
    }

    /// Terminate once the offset returned by a closure reaches its total
    #[must_use]
    pub fn offset_state_extractor_fn<I, F>(self, f: F) -> Self
    where
        I: PartialOrd + Send + 'static,
        F: Fn(&C) -> Result<OffsetState<I>> + Send + Sync + 'static,
    {
        self.offset_state_extractor::<I, _>(FromFn(f))
    }

    // ========================================================================
    // Item Extraction
    // ========================================================================

    /// Set the item extractor
    #[must_use]
    pub fn item_extractor(mut self, extractor: impl ItemExtractor<C, T> + 'static) -> Self {
        self.item_extractor = Some(Arc::new(extractor));
        self
    }

    /// Set the item extractor from a closure
    #[must_use]
    pub fn item_extractor_fn<F>(self, f: F) -> Self
    where
        F: Fn(&C) -> Result<Vec<T>> + Send + Sync + 'static,
    {
        self.item_extractor(FromFn(f))
    }

    /// Set the item extractor from an async closure
    #[must_use]
    pub fn item_extractor_async<F, Fut>(self, f: F) -> Self
    where
        F: Fn(&C, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
    {
        self.item_extractor(FromAsyncFn(f))
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Validate the configuration and produce a paginator
    ///
    /// Fails with [`Error::ConflictingTermination`] when more than one
    /// termination source was set, and with [`Error::MissingComponent`]
    /// naming the first absent component otherwise.
    pub fn build(self) -> Result<Paginator<C, T>> {
        if let Some((first, second)) = self.conflict {
            return Err(Error::ConflictingTermination { first, second });
        }

        let retriever = self
            .retriever
            .ok_or_else(|| Error::missing_component("page retriever", "page_retriever"))?;
        let context_extractor = self
            .context_extractor
            .ok_or_else(|| Error::missing_component("context extractor", "context_extractor"))?;
        let (_, predicate) = self.termination.ok_or_else(|| {
            Error::missing_component(
                "termination source",
                "termination_predicate`, `cursor_extractor` or `offset_state_extractor",
            )
        })?;
        let extractor = self
            .item_extractor
            .ok_or_else(|| Error::missing_component("item extractor", "item_extractor"))?;

        Ok(Paginator {
            retriever: Arc::new(Staged {
                retriever,
                context_extractor,
            }),
            predicate,
            extractor,
        })
    }

    fn set_termination(
        mut self,
        setter: &'static str,
        predicate: Arc<dyn TerminationPredicate<C>>,
    ) -> Self {
        match &self.termination {
            Some((first, _)) => {
                if self.conflict.is_none() {
                    self.conflict = Some((*first, setter));
                }
            }
            None => self.termination = Some((setter, predicate)),
        }
        self
    }
}

/// Retriever that runs a raw retrieval followed by context extraction
struct Staged<C, P> {
    retriever: Arc<dyn PageRetriever<C, P>>,
    context_extractor: Arc<dyn ContextExtractor<P, C>>,
}

#[async_trait]
impl<C, P> PageRetriever<C> for Staged<C, P>
where
    C: Send + Sync + 'static,
    P: Send + 'static,
{
    async fn fetch(&self, prior: &PriorContext<C>, cancel: &CancellationToken) -> Result<C> {
        let page = self.retriever.fetch(prior, cancel).await?;
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.context_extractor.extract_context(page, cancel).await
    }
}
