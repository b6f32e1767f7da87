//! Pagination types
//!
//! Value types shared by every strategy: the prior-page marker handed to page
//! retrievers and the offset state consumed by the offset/total policy.

use serde::{Deserialize, Serialize};

/// Default cursor type for cursor-presence pagination
pub type Cursor = String;

/// What a page retriever knows about the page before the one it must fetch
///
/// The first fetch of every traversal receives [`PriorContext::NoPriorPage`];
/// every later fetch receives the context produced by the previous one. This
/// keeps "nothing fetched yet" apart from a context whose payload happens to
/// be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PriorContext<C> {
    /// No page has been fetched yet
    #[default]
    NoPriorPage,
    /// Context of the most recently fetched page
    Context(C),
}

impl<C> PriorContext<C> {
    /// Check if this is the first fetch of a traversal
    pub fn is_first(&self) -> bool {
        matches!(self, Self::NoPriorPage)
    }

    /// Borrow the previous context, if any
    pub fn context(&self) -> Option<&C> {
        match self {
            Self::NoPriorPage => None,
            Self::Context(context) => Some(context),
        }
    }

    /// Take the previous context, if any
    pub fn into_context(self) -> Option<C> {
        match self {
            Self::NoPriorPage => None,
            Self::Context(context) => Some(context),
        }
    }

    /// Borrow the inner context as a `PriorContext` of a reference
    pub fn as_ref(&self) -> PriorContext<&C> {
        match self {
            Self::NoPriorPage => PriorContext::NoPriorPage,
            Self::Context(context) => PriorContext::Context(context),
        }
    }
}

impl<C> From<Option<C>> for PriorContext<C> {
    fn from(context: Option<C>) -> Self {
        context.map_or(Self::NoPriorPage, Self::Context)
    }
}

/// Offset and total as reported by the most recent page
///
/// `offset` counts the items consumed so far, `total` is the number of items
/// the source claims to hold. More pages exist while `offset < total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OffsetState<I = usize> {
    /// Items consumed so far
    pub offset: I,
    /// Total items known to the source
    pub total: I,
}

impl<I> OffsetState<I> {
    /// Create a new offset state
    pub fn new(offset: I, total: I) -> Self {
        Self { offset, total }
    }
}

impl<I: PartialOrd> OffsetState<I> {
    /// Check if another page should be fetched
    ///
    /// Strictly `offset < total`; a source whose total drops below the offset
    /// ends the traversal.
    pub fn has_more(&self) -> bool {
        self.offset < self.total
    }
}
