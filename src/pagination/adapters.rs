//! Closure adapters
//!
//! [`FromFn`] turns a plain closure into any strategy, [`FromAsyncFn`] does the
//! same for closures returning futures. The async variant hands the closure
//! its own clone of the traversal's cancellation token, so the returned
//! future can own everything it needs.

use super::strategies::{
    ContextExtractor, CursorExtractor, ItemExtractor, OffsetStateExtractor, PageRetriever,
    TerminationPredicate,
};
use super::types::{OffsetState, PriorContext};
use crate::error::Result;
use async_trait::async_trait;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Strategy backed by a synchronous closure
#[derive(Clone, Copy)]
pub struct FromFn<F>(pub F);

/// Strategy backed by a closure returning a future
#[derive(Clone, Copy)]
pub struct FromAsyncFn<F>(pub F);

impl<F> std::fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FromFn")
    }
}

impl<F> std::fmt::Debug for FromAsyncFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FromAsyncFn")
    }
}

// ============================================================================
// Synchronous closures
// ============================================================================

#[async_trait]
impl<C, P, F> PageRetriever<C, P> for FromFn<F>
where
    C: Sync + 'static,
    P: Send + 'static,
    F: Fn(&PriorContext<C>) -> Result<P> + Send + Sync + 'static,
{
    async fn fetch(&self, prior: &PriorContext<C>, _cancel: &CancellationToken) -> Result<P> {
        (self.0)(prior)
    }
}

#[async_trait]
impl<P, C, F> ContextExtractor<P, C> for FromFn<F>
where
    P: Send + 'static,
    C: Send + 'static,
    F: Fn(P) -> Result<C> + Send + Sync + 'static,
{
    async fn extract_context(&self, page: P, _cancel: &CancellationToken) -> Result<C> {
        (self.0)(page)
    }
}

#[async_trait]
impl<C, T, F> ItemExtractor<C, T> for FromFn<F>
where
    C: Sync + 'static,
    T: Send + 'static,
    F: Fn(&C) -> Result<Vec<T>> + Send + Sync + 'static,
{
    async fn extract_items(&self, context: &C, _cancel: &CancellationToken) -> Result<Vec<T>> {
        (self.0)(context)
    }
}

#[async_trait]
impl<C, F> TerminationPredicate<C> for FromFn<F>
where
    C: Sync + 'static,
    F: Fn(&C) -> Result<bool> + Send + Sync + 'static,
{
    async fn has_next(&self, context: &C, _cancel: &CancellationToken) -> Result<bool> {
        (self.0)(context)
    }
}

#[async_trait]
impl<C, K, F> CursorExtractor<C, K> for FromFn<F>
where
    C: Sync + 'static,
    K: Send + 'static,
    F: Fn(&C) -> Result<Option<K>> + Send + Sync + 'static,
{
    async fn extract_cursor(
        &self,
        context: &C,
        _cancel: &CancellationToken,
    ) -> Result<Option<K>> {
        (self.0)(context)
    }
}

#[async_trait]
impl<C, I, F> OffsetStateExtractor<C, I> for FromFn<F>
where
    C: Sync + 'static,
    I: Send + 'static,
    F: Fn(&C) -> Result<OffsetState<I>> + Send + Sync + 'static,
{
    async fn extract_offset_state(
        &self,
        context: &C,
        _cancel: &CancellationToken,
    ) -> Result<OffsetState<I>> {
        (self.0)(context)
    }
}

// ============================================================================
// Asynchronous closures
// ============================================================================

#[async_trait]
impl<C, P, F, Fut> PageRetriever<C, P> for FromAsyncFn<F>
where
    C: Sync + 'static,
    P: Send + 'static,
    F: Fn(&PriorContext<C>, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<P>> + Send + 'static,
{
    async fn fetch(&self, prior: &PriorContext<C>, cancel: &CancellationToken) -> Result<P> {
        (self.0)(prior, cancel.clone()).await
    }
}

#[async_trait]
impl<P, C, F, Fut> ContextExtractor<P, C> for FromAsyncFn<F>
where
    P: Send + 'static,
    C: Send + 'static,
    F: Fn(P, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<C>> + Send + 'static,
{
    async fn extract_context(&self, page: P, cancel: &CancellationToken) -> Result<C> {
        (self.0)(page, cancel.clone()).await
    }
}

#[async_trait]
impl<C, T, F, Fut> ItemExtractor<C, T> for FromAsyncFn<F>
where
    C: Sync + 'static,
    T: Send + 'static,
    F: Fn(&C, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
{
    async fn extract_items(&self, context: &C, cancel: &CancellationToken) -> Result<Vec<T>> {
        (self.0)(context, cancel.clone()).await
    }
}

#[async_trait]
impl<C, F, Fut> TerminationPredicate<C> for FromAsyncFn<F>
where
    C: Sync + 'static,
    F: Fn(&C, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool>> + Send + 'static,
{
    async fn has_next(&self, context: &C, cancel: &CancellationToken) -> Result<bool> {
        (self.0)(context, cancel.clone()).await
    }
}

#[async_trait]
impl<C, K, F, Fut> CursorExtractor<C, K> for FromAsyncFn<F>
where
    C: Sync + 'static,
    K: Send + 'static,
    F: Fn(&C, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<K>>> + Send + 'static,
{
    async fn extract_cursor(&self, context: &C, cancel: &CancellationToken) -> Result<Option<K>> {
        (self.0)(context, cancel.clone()).await
    }
}

#[async_trait]
impl<C, I, F, Fut> OffsetStateExtractor<C, I> for FromAsyncFn<F>
where
    C: Sync + 'static,
    I: Send + 'static,
    F: Fn(&C, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<OffsetState<I>>> + Send + 'static,
{
    async fn extract_offset_state(
        &self,
        context: &C,
        cancel: &CancellationToken,
    ) -> Result<OffsetState<I>> {
        (self.0)(context, cancel.clone()).await
    }
}
