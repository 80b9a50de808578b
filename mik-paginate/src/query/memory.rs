//! In-memory query collaborator.
//!
//! Evaluates filters, ordering, limit and offset over a fixed row set with
//! the same semantics a SQL engine would apply. Useful for tests, fixtures
//! and paginating data that is already loaded.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use super::predicate::Predicate;
use super::value::{Row, Value};
use super::Query;
use crate::sort::SortDirection;

/// Errors from [`MemoryQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MemoryError {
    /// A predicate names a parameter that was never bound.
    #[error("parameter ':{0}' is not bound")]
    UnboundParameter(String),
}

/// Query over rows held in memory.
///
/// Rows are shared behind an [`Arc`], so cloning a query for a probe does not
/// copy the data.
///
/// ```
/// use mik_paginate::{MemoryQuery, Query, Row, SortDirection, Value};
///
/// let rows = (1..=5).map(|i| Row::new().with("id", i));
/// let mut query = MemoryQuery::new(rows);
/// query.order_by("id", SortDirection::Descending);
/// query.set_limit(Some(2));
///
/// let ids: Vec<_> = query.execute().unwrap().iter().map(|r| r.get("id").cloned()).collect();
/// assert_eq!(ids, [Some(Value::Int(5)), Some(Value::Int(4))]);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryQuery {
    rows: Arc<[Row]>,
    filters: Vec<Predicate>,
    params: HashMap<String, Value>,
    order: Vec<(String, SortDirection)>,
    limit: Option<u64>,
    offset: u64,
}

impl MemoryQuery {
    /// Create a query over `rows`, kept in the given order until sorted.
    pub fn new(rows: impl IntoIterator<Item = Row>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            filters: Vec::new(),
            params: HashMap::new(),
            order: Vec::new(),
            limit: None,
            offset: 0,
        }
    }

    /// Add a filter, builder style.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filters.push(predicate);
        self
    }

    /// Bind a parameter, builder style.
    pub fn bind(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Total rows before filtering.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` if there are no rows at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn compare(&self, a: &Row, b: &Row) -> Ordering {
        for (column, direction) in &self.order {
            let left = a.get(column).unwrap_or(&Value::Null);
            let right = b.get(column).unwrap_or(&Value::Null);
            let ord = left.total_cmp(right);
            let ord = if direction.is_descending() { ord.reverse() } else { ord };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl Query for MemoryQuery {
    type Error = MemoryError;

    fn add_filter(&mut self, predicate: Predicate) {
        self.filters.push(predicate);
    }

    fn set_parameter(&mut self, name: &str, value: Value) {
        self.params.insert(name.to_string(), value);
    }

    fn order_by(&mut self, column: &str, direction: SortDirection) {
        self.order.clear();
        self.order.push((column.to_string(), direction));
    }

    fn add_order_by(&mut self, column: &str, direction: SortDirection) {
        self.order.push((column.to_string(), direction));
    }

    fn set_limit(&mut self, limit: Option<u64>) {
        self.limit = limit;
    }

    fn set_offset(&mut self, offset: u64) {
        self.offset = offset;
    }

    fn execute(&self) -> Result<Vec<Row>, Self::Error> {
        let lookup = |name: &str| self.params.get(name);

        let mut matched = Vec::new();
        for row in self.rows.iter() {
            let mut keep = true;
            for filter in &self.filters {
                let ok = filter
                    .evaluate(row, &lookup)
                    .map_err(|name| MemoryError::UnboundParameter(name.to_string()))?;
                if !ok {
                    keep = false;
                    break;
                }
            }
            if keep {
                matched.push(row);
            }
        }

        // stable, so unordered ties keep insertion order
        matched.sort_by(|a, b| self.compare(a, b));

        let skip = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let take = self
            .limit
            .map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));

        Ok(matched.into_iter().skip(skip).take(take).cloned().collect())
    }
}
