//! Identifier checks for names that end up spliced into SQL text.
//!
//! Sort columns, table names and selected fields cannot be bound as
//! parameters, so they are restricted to plain identifiers instead.

/// Maximum length for SQL identifiers (`PostgreSQL` limit is 63).
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Validate that a string is a safe SQL identifier.
///
/// A valid SQL identifier starts with an ASCII letter or underscore, contains
/// only ASCII letters, digits and underscores, and is 1-63 chars long.
///
/// # Examples
///
/// ```
/// use mik_paginate::is_valid_sql_identifier;
///
/// assert!(is_valid_sql_identifier("uniqueCol"));
/// assert!(is_valid_sql_identifier("_created_at"));
///
/// assert!(!is_valid_sql_identifier(""));
/// assert!(!is_valid_sql_identifier("posts.id"));
/// assert!(!is_valid_sql_identifier("id; DROP TABLE posts"));
/// ```
#[inline]
#[must_use]
pub fn is_valid_sql_identifier(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }

    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
