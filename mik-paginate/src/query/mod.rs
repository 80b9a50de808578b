//! The query collaborator paginators drive.
//!
//! Paginators never build SQL or touch storage themselves. They clone a base
//! [`Query`], add a keyset filter, ordering and a limit, and execute it. Two
//! implementations ship with the crate:
//!
//! - [`SqlQuery`] renders dialect SQL and hands it to a [`Connection`].
//! - [`MemoryQuery`] evaluates the same operations over rows it owns.

mod dialect;
mod identifier;
mod memory;
mod predicate;
mod sql;
mod value;

pub use dialect::{Dialect, Postgres, Sqlite};
pub use identifier::is_valid_sql_identifier;
pub use memory::{MemoryError, MemoryQuery};
pub use predicate::{Comparison, Predicate};
pub use sql::{Connection, SqlError, SqlQuery, Statement};
pub use value::{Row, Value};

use crate::sort::SortDirection;

/// Query-builder abstraction consumed by every paginator.
///
/// `Clone` must produce an independent copy: paginators clone the base query
/// for the main fetch and for every probe, and never mutate the original.
pub trait Query: Clone {
    /// Failure reported by [`execute`](Self::execute).
    type Error: std::error::Error + Send + Sync + 'static;

    /// AND a predicate onto the filters already present.
    fn add_filter(&mut self, predicate: Predicate);

    /// Bind one named parameter. Other bindings are left untouched.
    fn set_parameter(&mut self, name: &str, value: Value);

    /// Replace the ordering with a single column.
    fn order_by(&mut self, column: &str, direction: SortDirection);

    /// Append a column to the ordering.
    fn add_order_by(&mut self, column: &str, direction: SortDirection);

    /// Maximum number of rows to return; `None` removes the cap.
    fn set_limit(&mut self, limit: Option<u64>);

    /// Number of rows to skip.
    fn set_offset(&mut self, offset: u64);

    /// Run the query and return rows in order.
    fn execute(&self) -> Result<Vec<Row>, Self::Error>;
}
