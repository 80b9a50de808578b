//! Result contract shared by every pagination strategy.

use serde::Serialize;

/// Count and position markers of one page.
///
/// `P` is the position type: an opaque token (`String`) for cursor
/// pagination, a page number (`u64`) for offset pagination, and `()` for the
/// null strategy, which never reports positions.
///
/// # Example
///
/// ```
/// use mik_paginate::PaginationResult;
///
/// let result = PaginationResult::new(3, Some(1u64), Some(2), Some(3));
/// assert_eq!(result.results_count(), 3);
/// assert!(result.has_previous());
/// assert_eq!(result.next(), Some(&3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResult<P> {
    count: usize,
    previous: Option<P>,
    current: Option<P>,
    next: Option<P>,
}

impl<P> PaginationResult<P> {
    /// Assemble a result.
    pub const fn new(
        count: usize,
        previous: Option<P>,
        current: Option<P>,
        next: Option<P>,
    ) -> Self {
        Self {
            count,
            previous,
            current,
            next,
        }
    }

    /// Number of rows on this page.
    #[inline]
    pub const fn results_count(&self) -> usize {
        self.count
    }

    /// Position of the previous page, if one exists.
    #[inline]
    pub const fn previous(&self) -> Option<&P> {
        self.previous.as_ref()
    }

    /// Position the caller requested, echoed back.
    #[inline]
    pub const fn current(&self) -> Option<&P> {
        self.current.as_ref()
    }

    /// Position of the next page, if one exists.
    #[inline]
    pub const fn next(&self) -> Option<&P> {
        self.next.as_ref()
    }

    /// `true` when a previous page exists.
    #[inline]
    pub const fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// `true` when a next page exists.
    #[inline]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Convert the position markers, e.g. into absolute URLs.
    pub fn map<Q>(self, mut f: impl FnMut(P) -> Q) -> PaginationResult<Q> {
        PaginationResult {
            count: self.count,
            previous: self.previous.map(&mut f),
            current: self.current.map(&mut f),
            next: self.next.map(&mut f),
        }
    }
}
