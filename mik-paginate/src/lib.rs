// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code items in docs - extensive doc changes needed
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Consuming builder methods return Self
#![allow(clippy::must_use_candidate)] // Builder methods - fluent API doesn't need must_use
#![allow(clippy::format_push_string)] // String building style preference
#![allow(clippy::cast_precision_loss)] // i64 -> f64 only when comparing mixed numeric kinds
#![allow(clippy::exhaustive_structs)] // Page and request structs are plain data
#![allow(clippy::exhaustive_enums)] // SortDirection and Comparison are closed sets

//! # mik-paginate - Keyset and Offset Pagination
//!
//! Stable pagination over ordered result sets. Two strategies share one
//! sorting configuration and one result contract:
//!
//! - **Cursor** (keyset): pages are addressed by the sort key of a boundary
//!   row, carried between requests as an opaque token. Pages stay stable
//!   while rows are inserted or deleted, and each page costs one query plus
//!   two single-row probes that detect whether neighbours exist.
//! - **Offset**: pages are numbered. One extra row is fetched to detect a
//!   next page.
//!
//! Paginators drive a [`Query`] collaborator. [`SqlQuery`] renders Postgres
//! or `SQLite` SQL for a caller-supplied [`Connection`]; [`MemoryQuery`]
//! evaluates the same operations over rows already in memory.
//!
//! ## Quick Start
//!
//! ```
//! # use mik_paginate::prelude::*;
//! let query = MemoryQuery::new((1..=11).map(|i: i64| {
//!     Row::new().with("uniqueCol", i).with("nonUniqueCol", i + i % 2)
//! }));
//!
//! let config = CursorConfig::new()
//!     .primary_sort("nonUniqueCol", SortDirection::Ascending)
//!     .backup_sort("uniqueCol", SortDirection::Ascending)
//!     .limit(3);
//!
//! let page = paginate_cursor(&query, &config).unwrap();
//! assert_eq!(page.result.results_count(), 3);
//! assert_eq!(page.result.previous(), None);
//!
//! // Feed the next token back in to continue
//! let next = page.result.next().cloned().unwrap();
//! let page = paginate_cursor(&query, &config.after(next)).unwrap();
//! assert!(page.result.has_previous());
//! ```
//!
//! ## Offset Pagination
//!
//! ```
//! # use mik_paginate::prelude::*;
//! let query = MemoryQuery::new((1..=7).map(|i: i64| Row::new().with("id", i)));
//! let config = OffsetConfig::new().primary_sort("id", "desc").per_page(3).page(3);
//!
//! let page = paginate_offset(&query, &config).unwrap();
//! assert_eq!(page.result.previous(), Some(&2));
//! assert_eq!(page.result.next(), None);
//! assert_eq!(page.items().next().and_then(|row| row.get("id")), Some(&Value::Int(1)));
//! ```
//!
//! ## Tokens
//!
//! Tokens are `primary|backup` passed through [`ObfuscatedCodec`] (rot13,
//! base64, rot13). This deters casual editing only: a client can still
//! decode a token and forge another. Plug a signing [`TokenCodec`] into
//! [`CursorConfig::codec`] when that matters.
//!
//! ## Errors
//!
//! | Error | Raised when |
//! |-------|-------------|
//! | [`ConfigError`] | sorting is missing or invalid |
//! | [`TokenError`] | a client token cannot be decoded |
//! | [`PaginationError::Execution`] | the query failed |
//!
//! Token errors are client errors ([`PaginationError::is_client_error`]).

mod error;
mod paginator;
mod query;
mod request;
mod result;
mod sort;
mod token;

pub use error::{ConfigError, PaginationError, TokenError};
pub use paginator::{
    BACKUP_PARAM, CursorConfig, CursorPaginator, DEFAULT_PER_PAGE, Items, KeysProcessor,
    NullConfig, NullPaginator, OffsetConfig, OffsetPaginator, PRIMARY_PARAM, Page, Paginator,
    paginate_cursor, paginate_null, paginate_offset,
};
pub use query::{
    Comparison, Connection, Dialect, MemoryError, MemoryQuery, Postgres, Predicate, Query, Row,
    SqlError, SqlQuery, Sqlite, Statement, Value, is_valid_sql_identifier,
};
pub use request::{CursorRequest, OffsetRequest};
pub use result::PaginationResult;
pub use sort::{IntoSortDirection, SortDirection, SortSpec, Sorting};
pub use token::{DELIMITER, MAX_TOKEN_SIZE, ObfuscatedCodec, PageToken, PlainCodec, TokenCodec};

/// Build a Postgres query over `table`.
///
/// Convenience function that creates a `SqlQuery` with Postgres dialect.
#[must_use]
pub fn postgres<C: Connection>(connection: C, table: &str) -> SqlQuery<Postgres, C> {
    SqlQuery::new(Postgres, connection, table)
}

/// Build a `SQLite` query over `table`.
///
/// Convenience function that creates a `SqlQuery` with `SQLite` dialect.
#[must_use]
pub fn sqlite<C: Connection>(connection: C, table: &str) -> SqlQuery<Sqlite, C> {
    SqlQuery::new(Sqlite, connection, table)
}

/// Prelude module for convenient imports.
///
/// ```
/// use mik_paginate::prelude::*;
/// // Now CursorConfig, paginate_cursor(), MemoryQuery, etc. are available
/// let config = CursorConfig::new().primary_sort("id", SortDirection::Descending);
/// assert_eq!(config.sorting().primary_column(), Ok("id"));
/// ```
pub mod prelude {
    pub use crate::{
        Comparison, ConfigError, Connection, CursorConfig, CursorPaginator, CursorRequest,
        MemoryQuery, NullConfig, NullPaginator, ObfuscatedCodec, OffsetConfig, OffsetPaginator,
        OffsetRequest, Page, PageToken, PaginationError, PaginationResult, Paginator, PlainCodec,
        Predicate, Query, Row, SortDirection, SqlQuery, TokenCodec, TokenError, Value,
        paginate_cursor, paginate_null, paginate_offset, postgres, sqlite,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    struct Offline;

    impl Connection for Offline {
        type Error = std::io::Error;

        fn fetch_all(&self, _: &Statement) -> Result<Vec<Row>, Self::Error> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_postgres_helper() {
        let stmt = postgres(Offline, "users").fields(&["id", "name"]).build().unwrap();
        assert_eq!(stmt.sql, "SELECT id, name FROM users");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_sqlite_helper() {
        let mut query = sqlite(Offline, "users");
        query.set_offset(20);
        assert_eq!(query.build().unwrap().sql, "SELECT * FROM users LIMIT -1 OFFSET 20");
    }

    #[test]
    fn test_cursor_over_sql_renders_keyset() {
        #[derive(Debug, Default)]
        struct Capture(std::cell::RefCell<Vec<String>>);

        impl Connection for Capture {
            type Error = std::io::Error;

            fn fetch_all(&self, statement: &Statement) -> Result<Vec<Row>, Self::Error> {
                self.0.borrow_mut().push(statement.sql.clone());
                Ok(Vec::new())
            }
        }

        let capture = Capture::default();
        let config = CursorConfig::new()
            .primary_sort("nonUniqueCol", "asc")
            .backup_sort("uniqueCol", "asc")
            .limit(3)
            .before("10|9")
            .encode_tokens(false);
        let page = paginate_cursor(&postgres(&capture, "test"), &config).unwrap();
        assert_eq!(page.result.results_count(), 0);

        // empty page: no probes
        let seen = capture.0.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            "SELECT * FROM test WHERE (nonUniqueCol < $1 OR (nonUniqueCol = $2 AND uniqueCol < $3)) \
             ORDER BY nonUniqueCol DESC, uniqueCol DESC LIMIT 3"
        );
    }
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
