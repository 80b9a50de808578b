//! Error taxonomy for pagination.
//!
//! Three families, all raised synchronously from `paginate`:
//!
//! | Error | Raised when | Attributable to |
//! |-------|-------------|-----------------|
//! | [`ConfigError`] | sort configuration is missing or invalid | the calling service |
//! | [`TokenError`] | a caller-supplied boundary token cannot be parsed | the client |
//! | [`PaginationError::Execution`] | the query collaborator failed | the data source |
//!
//! Configuration and token errors are detected before any query executes.

use thiserror::Error;

use crate::token::MAX_TOKEN_SIZE;

/// Invalid or incomplete sort configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// No primary sort was configured.
    #[error("primary sort must be set first")]
    MissingPrimarySort,
    /// The primary sort column name was empty.
    #[error("primary sort column name can not be empty")]
    EmptyPrimaryColumn,
    /// A sort direction string was neither ascending nor descending.
    #[error("unknown sort order '{0}'")]
    UnknownSortOrder(String),
    /// Cursor pagination requires a unique tie-breaking column.
    #[error("backup sort is required for cursor pagination")]
    MissingBackupSort,
    /// A column name is not a safe SQL identifier.
    #[error(
        "invalid sort column '{0}': must start with letter/underscore, \
         contain only ASCII alphanumeric/underscore, and be 1-63 chars"
    )]
    InvalidColumn(String),
    /// A fetched row does not carry one of the sort columns.
    #[error("sort column '{0}' is missing from fetched rows")]
    MissingSortColumn(String),
}

/// A boundary token could not be turned back into a key pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TokenError {
    /// The decoded payload lacks the field delimiter.
    #[error("failed to parse cursor")]
    MissingDelimiter,
    /// The codec could not invert the token.
    #[error("failed to decode cursor")]
    Undecodable,
    /// The token exceeds [`MAX_TOKEN_SIZE`].
    #[error("cursor exceeds maximum size ({}KB limit)", MAX_TOKEN_SIZE / 1024)]
    TooLarge,
}

impl TokenError {
    /// Returns `true` if this is an encoding/format error.
    ///
    /// Includes `MissingDelimiter` and `Undecodable`.
    #[inline]
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(self, Self::MissingDelimiter | Self::Undecodable)
    }

    /// Returns `true` if this is a size/limit error.
    #[inline]
    #[must_use]
    pub const fn is_limit_error(&self) -> bool {
        matches!(self, Self::TooLarge)
    }
}

/// Failure of a single `paginate` call.
///
/// `E` is the error type of the query collaborator; it is carried unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PaginationError<E> {
    /// The paginator was misconfigured.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The caller-supplied token was malformed.
    #[error(transparent)]
    Token(#[from] TokenError),
    /// The query collaborator failed.
    #[error("query execution failed: {0}")]
    Execution(#[source] E),
}

impl<E> PaginationError<E> {
    /// Returns `true` when the failure was caused by client input.
    ///
    /// Handlers should map these to a 4xx response rather than a server fault.
    #[inline]
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Token(_))
    }

    /// Returns the configuration error, if this is one.
    #[must_use]
    pub const fn as_config(&self) -> Option<&ConfigError> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the token error, if this is one.
    #[must_use]
    pub const fn as_token(&self) -> Option<&TokenError> {
        match self {
            Self::Token(err) => Some(err),
            _ => None,
        }
    }
}
