//! Sort configuration shared by the cursor and offset strategies.
//!
//! A paginator sorts by a primary column and, optionally, a backup column
//! that breaks ties between rows sharing a primary value. Cursor pagination
//! needs the backup column to establish a total order; offset pagination
//! only benefits from it.
//!
//! Setters never fail. Problems are recorded and reported by the accessors,
//! which every strategy calls before issuing a query.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::query::is_valid_sql_identifier;

/// Direction of a sort column.
///
/// # Example
///
/// ```
/// use mik_paginate::SortDirection;
///
/// let dir: SortDirection = "DESC".parse().unwrap();
/// assert_eq!(dir, SortDirection::Descending);
/// assert_eq!(dir.inverse(), SortDirection::Ascending);
/// assert_eq!(dir.to_string(), "DESC");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest values first.
    #[default]
    #[serde(alias = "asc", alias = "ASC")]
    Ascending,
    /// Largest values first.
    #[serde(alias = "desc", alias = "DESC")]
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    #[inline]
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// `true` for [`SortDirection::Descending`].
    #[inline]
    #[must_use]
    pub const fn is_descending(self) -> bool {
        matches!(self, Self::Descending)
    }

    /// SQL keyword for this direction.
    #[inline]
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for SortDirection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") || s.eq_ignore_ascii_case("ascending") {
            Ok(Self::Ascending)
        } else if s.eq_ignore_ascii_case("desc") || s.eq_ignore_ascii_case("descending") {
            Ok(Self::Descending)
        } else {
            Err(ConfigError::UnknownSortOrder(s.to_string()))
        }
    }
}

/// Types accepted wherever a sort direction is configured.
///
/// Strings are parsed case-insensitively (`"asc"`, `"DESC"`); anything else
/// is kept as an error and surfaces when pagination runs.
pub trait IntoSortDirection {
    /// Convert into a direction or a configuration error.
    fn into_sort_direction(self) -> Result<SortDirection, ConfigError>;
}

impl IntoSortDirection for SortDirection {
    fn into_sort_direction(self) -> Result<SortDirection, ConfigError> {
        Ok(self)
    }
}

impl IntoSortDirection for &str {
    fn into_sort_direction(self) -> Result<SortDirection, ConfigError> {
        self.parse()
    }
}

impl IntoSortDirection for String {
    fn into_sort_direction(self) -> Result<SortDirection, ConfigError> {
        self.as_str().parse()
    }
}

impl IntoSortDirection for &String {
    fn into_sort_direction(self) -> Result<SortDirection, ConfigError> {
        self.as_str().parse()
    }
}

/// A validated sort column with its direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortSpec {
    column: String,
    direction: SortDirection,
}

impl SortSpec {
    /// Create a sort spec, validating the column name.
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Result<Self, ConfigError> {
        let column = column.into();
        if !is_valid_sql_identifier(&column) {
            return Err(ConfigError::InvalidColumn(column));
        }
        Ok(Self { column, direction })
    }

    /// Column name.
    #[inline]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Sort direction.
    #[inline]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }
}

/// Primary and backup sort slots.
///
/// ```
/// use mik_paginate::{ConfigError, SortDirection, Sorting};
///
/// let sorting = Sorting::default()
///     .primary("created_at", "desc")
///     .backup("id", SortDirection::Ascending);
///
/// assert_eq!(sorting.primary_column(), Ok("created_at"));
/// assert_eq!(sorting.primary_direction(), Ok(SortDirection::Descending));
/// assert_eq!(sorting.backup_column(), Ok(Some("id")));
///
/// let unset = Sorting::default();
/// assert_eq!(unset.primary_column(), Err(ConfigError::MissingPrimarySort));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sorting {
    primary: Option<Result<SortSpec, ConfigError>>,
    backup: Option<Result<SortSpec, ConfigError>>,
}

impl Sorting {
    /// Set the primary sort. An empty column is a configuration error.
    pub fn primary(mut self, column: impl Into<String>, direction: impl IntoSortDirection) -> Self {
        let column = column.into();
        self.primary = Some(if column.is_empty() {
            Err(ConfigError::EmptyPrimaryColumn)
        } else {
            direction
                .into_sort_direction()
                .and_then(|dir| SortSpec::new(column, dir))
        });
        self
    }

    /// Set the backup (tie-breaker) sort. An empty column clears it.
    pub fn backup(mut self, column: impl Into<String>, direction: impl IntoSortDirection) -> Self {
        let column = column.into();
        let direction = direction.into_sort_direction();
        self.backup = if column.is_empty() {
            // still report a bad direction
            direction.err().map(Err)
        } else {
            Some(direction.and_then(|dir| SortSpec::new(column, dir)))
        };
        self
    }

    /// The primary sort, or the reason it is unusable.
    pub fn primary_spec(&self) -> Result<&SortSpec, ConfigError> {
        match &self.primary {
            Some(Ok(spec)) => Ok(spec),
            Some(Err(err)) => Err(err.clone()),
            None => Err(ConfigError::MissingPrimarySort),
        }
    }

    /// The backup sort if one is set, or the reason it is unusable.
    pub fn backup_spec(&self) -> Result<Option<&SortSpec>, ConfigError> {
        match &self.backup {
            Some(Ok(spec)) => Ok(Some(spec)),
            Some(Err(err)) => Err(err.clone()),
            None => Ok(None),
        }
    }

    /// Primary column name.
    pub fn primary_column(&self) -> Result<&str, ConfigError> {
        self.primary_spec().map(SortSpec::column)
    }

    /// Primary direction.
    pub fn primary_direction(&self) -> Result<SortDirection, ConfigError> {
        self.primary_spec().map(SortSpec::direction)
    }

    /// Backup column name, if set.
    pub fn backup_column(&self) -> Result<Option<&str>, ConfigError> {
        Ok(self.backup_spec()?.map(SortSpec::column))
    }

    /// Backup direction, if set.
    pub fn backup_direction(&self) -> Result<Option<SortDirection>, ConfigError> {
        Ok(self.backup_spec()?.map(SortSpec::direction))
    }
}
