//! Offset pagination.
//!
//! Fetches `per_page + 1` rows at offset `(page - 1) * per_page`. The extra
//! row only proves a next page exists and is never exposed.

use tracing::debug;

use super::cursor::DEFAULT_PER_PAGE;
use super::{Items, Page, Paginator};
use crate::error::PaginationError;
use crate::query::{Query, Row};
use crate::result::PaginationResult;
use crate::sort::{IntoSortDirection, Sorting};

/// Immutable offset pagination settings.
///
/// ```
/// use mik_paginate::OffsetConfig;
///
/// let config = OffsetConfig::new().primary_sort("id", "asc").page(0).per_page(-1);
/// assert_eq!(config.current_page(), 1);
/// assert_eq!(config.page_size(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetConfig {
    sorting: Sorting,
    page: u64,
    per_page: u64,
}

impl Default for OffsetConfig {
    fn default() -> Self {
        Self {
            sorting: Sorting::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl OffsetConfig {
    /// Page 1, 20 rows per page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the primary sort column.
    pub fn primary_sort(
        mut self,
        column: impl Into<String>,
        direction: impl IntoSortDirection,
    ) -> Self {
        self.sorting = self.sorting.primary(column, direction);
        self
    }

    /// Set the tie-breaking sort column. Optional, but keeps ties stable across pages.
    pub fn backup_sort(
        mut self,
        column: impl Into<String>,
        direction: impl IntoSortDirection,
    ) -> Self {
        self.sorting = self.sorting.backup(column, direction);
        self
    }

    /// 1-based page index. Non-positive values select page 1.
    pub fn page(mut self, page: i64) -> Self {
        self.page = u64::try_from(page).unwrap_or(0).max(1);
        self
    }

    /// Rows per page. Non-positive values keep the current size.
    pub fn per_page(mut self, per_page: i64) -> Self {
        if let Ok(per_page @ 1..) = u64::try_from(per_page) {
            self.per_page = per_page;
        }
        self
    }

    /// Sort configuration.
    pub const fn sorting(&self) -> &Sorting {
        &self.sorting
    }

    /// Requested page.
    pub const fn current_page(&self) -> u64 {
        self.page
    }

    /// Rows per page.
    pub const fn page_size(&self) -> u64 {
        self.per_page
    }
}

/// Fetch one numbered page from `query`.
pub fn paginate_offset<Q: Query>(
    query: &Q,
    config: &OffsetConfig,
) -> Result<Page<u64>, PaginationError<Q::Error>> {
    let primary = config.sorting.primary_spec()?;
    let backup = config.sorting.backup_spec()?;

    let page = config.page;
    let per_page = config.per_page;
    debug!(target: "mik_paginate::offset", page, per_page, "fetching offset page");

    let mut main = query.clone();
    main.order_by(primary.column(), primary.direction());
    if let Some(backup) = backup {
        main.add_order_by(backup.column(), backup.direction());
    }
    main.set_offset((page - 1).saturating_mul(per_page));
    main.set_limit(Some(per_page.saturating_add(1)));

    let mut rows = main.execute().map_err(PaginationError::Execution)?;
    let limit = usize::try_from(per_page).unwrap_or(usize::MAX);
    let has_next = rows.len() > limit;
    rows.truncate(limit);

    let result = PaginationResult::new(
        rows.len(),
        (page >= 2).then(|| page - 1),
        Some(page),
        has_next.then(|| page + 1),
    );
    debug!(
        target: "mik_paginate::offset",
        count = result.results_count(),
        has_previous = result.has_previous(),
        has_next,
        "offset page fetched"
    );

    Ok(Page {
        result,
        items: rows,
    })
}

/// Stateful offset paginator over a base query.
#[derive(Debug)]
pub struct OffsetPaginator<Q> {
    query: Q,
    config: OffsetConfig,
    items: Vec<Row>,
}

impl<Q: Query> OffsetPaginator<Q> {
    /// Wrap a base query.
    pub const fn new(query: Q, config: OffsetConfig) -> Self {
        Self {
            query,
            config,
            items: Vec::new(),
        }
    }

    /// Current configuration.
    pub const fn config(&self) -> &OffsetConfig {
        &self.config
    }

    /// Replace the configuration for the next call.
    pub fn set_config(&mut self, config: OffsetConfig) {
        self.config = config;
    }
}

impl<Q: Query> Paginator for OffsetPaginator<Q> {
    type Position = u64;
    type Error = Q::Error;

    fn paginate(&mut self) -> Result<PaginationResult<u64>, PaginationError<Q::Error>> {
        let (result, items) = paginate_offset(&self.query, &self.config)?.into_parts();
        self.items = items;
        Ok(result)
    }

    fn items(&self) -> Items<'_> {
        self.items.iter()
    }

    fn take_items(&mut self) -> Vec<Row> {
        std::mem::take(&mut self.items)
    }
}
