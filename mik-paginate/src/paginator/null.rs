//! Pass-through strategy: one capped page, no positions.

use tracing::debug;

use super::{Items, Page, Paginator};
use crate::error::PaginationError;
use crate::query::{Query, Row};
use crate::result::PaginationResult;

/// Optional row cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullConfig {
    limit: Option<u64>,
}

impl NullConfig {
    /// No cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the row count. `None` removes the cap; non-positive values keep
    /// the current one.
    pub fn limit(mut self, limit: Option<i64>) -> Self {
        match limit {
            None => self.limit = None,
            Some(n) => {
                if let Ok(n @ 1..) = u64::try_from(n) {
                    self.limit = Some(n);
                }
            }
        }
        self
    }

    /// Current cap.
    pub const fn max_rows(&self) -> Option<u64> {
        self.limit
    }
}

/// Fetch everything up to the configured cap.
pub fn paginate_null<Q: Query>(
    query: &Q,
    config: &NullConfig,
) -> Result<Page<()>, PaginationError<Q::Error>> {
    let mut main = query.clone();
    main.set_limit(config.limit);
    let rows = main.execute().map_err(PaginationError::Execution)?;
    debug!(target: "mik_paginate::null", limit = ?config.limit, count = rows.len(), "fetched rows");

    Ok(Page {
        result: PaginationResult::new(rows.len(), None, None, None),
        items: rows,
    })
}

/// Stateful pass-through paginator.
#[derive(Debug)]
pub struct NullPaginator<Q> {
    query: Q,
    config: NullConfig,
    items: Vec<Row>,
}

impl<Q: Query> NullPaginator<Q> {
    /// Wrap a base query.
    pub const fn new(query: Q, config: NullConfig) -> Self {
        Self {
            query,
            config,
            items: Vec::new(),
        }
    }

    /// Replace the configuration for the next call.
    pub fn set_config(&mut self, config: NullConfig) {
        self.config = config;
    }
}

impl<Q: Query> Paginator for NullPaginator<Q> {
    type Position = ();
    type Error = Q::Error;

    fn paginate(&mut self) -> Result<PaginationResult<()>, PaginationError<Q::Error>> {
        let (result, items) = paginate_null(&self.query, &self.config)?.into_parts();
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
