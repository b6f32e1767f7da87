//! Traversal state machine
//!
//! One `Traversal` per call to `Paginator::items`. It owns the only copy of
//! the current context and moves linearly from `NotStarted` through
//! `HasContext` to `Done`.

use super::Paginator;
use crate::error::{Error, Result};
use crate::pagination::PriorContext;
use tokio_util::sync::CancellationToken;
use tracing::debug;

enum State<C, T> {
    /// Nothing fetched yet
    NotStarted,
    /// A page has been fetched; `pending` holds its items not yet yielded
    HasContext {
        context: C,
        pending: std::vec::IntoIter<T>,
    },
    /// Finished, failed, or cancelled
    Done,
}

pub(super) struct Traversal<C, T> {
    paginator: Paginator<C, T>,
    cancel: CancellationToken,
    state: State<C, T>,
    pages: usize,
    yielded: usize,
}

impl<C, T> Traversal<C, T>
where
    C: Send + Sync + 'static,
    T: Send + 'static,
{
    pub(super) fn new(paginator: Paginator<C, T>, cancel: CancellationToken) -> Self {
        Self {
            paginator,
            cancel,
            state: State::NotStarted,
            pages: 0,
            yielded: 0,
        }
    }

    /// Produce the next item, `None` once the traversal is over
    pub(super) async fn next_item(&mut self) -> Option<Result<T>> {
        loop {
            match &mut self.state {
                State::Done => return None,
                State::HasContext { pending, .. } => {
                    if let Some(item) = pending.next() {
                        if self.cancel.is_cancelled() {
                            return Some(Err(self.abort(Error::Cancelled)));
                        }
                        self.yielded += 1;
                        return Some(Ok(item));
                    }
                }
                State::NotStarted => {}
            }

            match self.advance().await {
                Ok(true) => {}
                Ok(false) => {
                    self.finish();
                    return None;
                }
                Err(e) => return Some(Err(self.abort(e))),
            }
        }
    }

    /// Decide whether to fetch, then fetch and extract the next page
    ///
    /// Returns `Ok(false)` when the termination predicate ends the traversal.
    async fn advance(&mut self) -> Result<bool> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let prior = match std::mem::replace(&mut self.state, State::Done) {
            State::NotStarted => PriorContext::NoPriorPage,
            State::HasContext { context, .. } => {
                if !self
                    .paginator
                    .predicate
                    .has_next(&context, &self.cancel)
                    .await?
                {
                    return Ok(false);
                }
                if self.cancel.is_cancelled() {
                    return Err(Error::Cancelled);
                }
                PriorContext::Context(context)
            }
            State::Done => return Ok(false),
        };

        let page = self.pages + 1;
        debug!("Fetching page {page}");
        let context = self.paginator.retriever.fetch(&prior, &self.cancel).await?;
        drop(prior);
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.pages = page;

        let items = self
            .paginator
            .extractor
            .extract_items(&context, &self.cancel)
            .await?;
        debug!("Page {page}: extracted {} items", items.len());

        self.state = State::HasContext {
            context,
            pending: items.into_iter(),
        };
        Ok(true)
    }

    fn finish(&mut self) {
        self.state = State::Done;
        debug!(
            "Traversal complete: {} items in {} pages",
            self.yielded, self.pages
        );
    }

    fn abort(&mut self, error: Error) -> Error {
        self.state = State::Done;
        if error.is_cancelled() {
            debug!(
                "Traversal cancelled after {} items in {} pages",
                self.yielded, self.pages
            );
        } else {
            debug!(
                "Traversal aborted after {} items in {} pages: {error}",
                self.yielded, self.pages
            );
        }
        error
    }
}
