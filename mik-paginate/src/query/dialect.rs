//! SQL dialects for Postgres and `SQLite`.
//!
//! Only the syntax that differs between the two is abstracted here:
//! placeholder style and the way an unbounded `LIMIT` is spelled.

/// SQL dialect trait for database-specific syntax.
pub trait Dialect: Clone + Copy {
    /// Format a parameter placeholder (e.g., `$1` for Postgres, `?1` for `SQLite`).
    fn param(&self, idx: usize) -> String;

    /// `LIMIT` clause rendered when an offset is set without a limit.
    fn unbounded_limit(&self) -> &'static str;

    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;
}

/// Postgres dialect.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Postgres;

impl Dialect for Postgres {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("${idx}")
    }

    #[inline]
    fn unbounded_limit(&self) -> &'static str {
        "LIMIT ALL"
    }

    #[inline]
    fn name(&self) -> &'static str {
        "postgres"
    }
}

/// `SQLite` dialect.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Sqlite;

impl Dialect for Sqlite {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("?{idx}")
    }

    #[inline]
    fn unbounded_limit(&self) -> &'static str {
        // SQLite has no LIMIT ALL; a negative limit means no limit
        "LIMIT -1"
    }

    #[inline]
    fn name(&self) -> &'static str {
        "sqlite"
    }
}
