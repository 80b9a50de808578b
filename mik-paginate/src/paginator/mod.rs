//! Pagination strategies.
//!
//! # Strategies
//!
//! | Strategy   | Position        | Round-trips | Stability | Use Case               |
//! |------------|-----------------|-------------|-----------|------------------------|
//! | **Cursor** | opaque token    | 1 to 3      | Stable    | Feeds, infinite scroll |
//! | **Offset** | page number     | 1           | Unstable* | Admin panels, reports  |
//! | **Null**   | none            | 1           | n/a       | Small capped lists     |
//!
//! *Unstable = results shift if data changes between requests
//!
//! Each strategy is a pure function over a base [`Query`](crate::Query) and
//! an immutable config (`paginate_cursor`, `paginate_offset`,
//! `paginate_null`) returning a [`Page`]. The stateful adapters implement
//! [`Paginator`] on top for callers that keep one paginator per request.

mod cursor;
mod keyset;
mod null;
mod offset;

pub use cursor::{CursorConfig, CursorPaginator, DEFAULT_PER_PAGE, KeysProcessor, paginate_cursor};
pub use keyset::{BACKUP_PARAM, PRIMARY_PARAM};
pub use null::{NullConfig, NullPaginator, paginate_null};
pub use offset::{OffsetConfig, OffsetPaginator, paginate_offset};

use serde::Serialize;

use crate::error::PaginationError;
use crate::query::Row;
use crate::result::PaginationResult;

/// Iterator over the rows of the last page.
pub type Items<'a> = std::slice::Iter<'a, Row>;

/// One fetched page: the result markers plus the rows in caller order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<P> {
    /// Count and position markers.
    pub result: PaginationResult<P>,
    /// Rows, in the order they should be shown.
    pub items: Vec<Row>,
}

impl<P> Page<P> {
    /// Iterate the rows.
    pub fn items(&self) -> Items<'_> {
        self.items.iter()
    }

    /// Split into result and rows.
    pub fn into_parts(self) -> (PaginationResult<P>, Vec<Row>) {
        (self.result, self.items)
    }
}

/// Common surface of the stateful paginators.
///
/// `paginate` runs the strategy and buffers the rows; `items` walks the
/// buffer of the most recent successful call. A failed call leaves the
/// previous buffer untouched.
pub trait Paginator {
    /// Position marker type.
    type Position;
    /// Error of the underlying query.
    type Error;

    /// Fetch the configured page.
    fn paginate(
        &mut self,
    ) -> Result<PaginationResult<Self::Position>, PaginationError<Self::Error>>;

    /// Rows of the last fetched page.
    fn items(&self) -> Items<'_>;

    /// Move the buffered rows out, leaving the buffer empty.
    fn take_items(&mut self) -> Vec<Row>;
}
