//! SQL-rendering query collaborator.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::trace;

use super::dialect::Dialect;
use super::identifier::is_valid_sql_identifier;
use super::predicate::{Comparison, Predicate};
use super::value::{Row, Value};
use super::Query;
use crate::sort::SortDirection;

/// A rendered statement: SQL text plus positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// SQL with dialect placeholders.
    pub sql: String,
    /// Values for the placeholders, in order.
    pub params: Vec<Value>,
}

/// Executes rendered statements.
///
/// Implement this over whatever driver the service already uses.
pub trait Connection {
    /// Driver error.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run `statement` and return every row.
    fn fetch_all(&self, statement: &Statement) -> Result<Vec<Row>, Self::Error>;
}

impl<C: Connection + ?Sized> Connection for &C {
    type Error = C::Error;

    fn fetch_all(&self, statement: &Statement) -> Result<Vec<Row>, Self::Error> {
        (**self).fetch_all(statement)
    }
}

/// Errors from [`SqlQuery`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqlError<E> {
    /// A predicate names a parameter that was never bound.
    #[error("parameter ':{0}' is not bound")]
    UnboundParameter(String),
    /// A table, field or column name is not a plain identifier.
    #[error("invalid SQL identifier '{0}'")]
    InvalidIdentifier(String),
    /// The connection failed.
    #[error("connection error: {0}")]
    Connection(#[source] E),
}

/// SQL query builder executing through a [`Connection`].
///
/// # Example
///
/// ```
/// use mik_paginate::{Comparison, Predicate, Query, SortDirection, Value, sqlite};
/// # use mik_paginate::{Connection, Row, Statement};
/// # #[derive(Clone)]
/// # struct NoDb;
/// # impl Connection for NoDb {
/// #     type Error = std::io::Error;
/// #     fn fetch_all(&self, _: &Statement) -> Result<Vec<Row>, Self::Error> { Ok(vec![]) }
/// # }
///
/// let mut query = sqlite(NoDb, "posts")
///     .fields(&["id", "title"])
///     .filter(Predicate::compare("published", Comparison::Eq, "published"))
///     .bind("published", true);
/// query.order_by("id", SortDirection::Descending);
/// query.set_limit(Some(20));
///
/// let stmt = query.build().unwrap();
/// assert_eq!(
///     stmt.sql,
///     "SELECT id, title FROM posts WHERE published = ?1 ORDER BY id DESC LIMIT 20"
/// );
/// assert_eq!(stmt.params, vec![Value::Bool(true)]);
/// ```
#[derive(Debug, Clone)]
pub struct SqlQuery<D: Dialect, C> {
    dialect: D,
    connection: C,
    table: String,
    fields: Vec<String>,
    filters: Vec<Predicate>,
    params: BTreeMap<String, Value>,
    order: Vec<(String, SortDirection)>,
    limit: Option<u64>,
    offset: u64,
}

impl<D: Dialect, C: Connection> SqlQuery<D, C> {
    /// Create a query selecting every column from `table`.
    ///
    /// The table name is validated when the statement is built.
    pub fn new(dialect: D, connection: C, table: impl Into<String>) -> Self {
        Self {
            dialect,
            connection,
            table: table.into(),
            fields: Vec::new(),
            filters: Vec::new(),
            params: BTreeMap::new(),
            order: Vec::new(),
            limit: None,
            offset: 0,
        }
    }

    /// Set the fields to SELECT.
    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|s| (*s).to_string()).collect();
        self
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

    /// The dialect this query renders for.
    pub const fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Render the statement without executing it.
    pub fn build(&self) -> Result<Statement, SqlError<C::Error>> {
        let check = |name: &str| -> Result<(), SqlError<C::Error>> {
            if is_valid_sql_identifier(name) {
                Ok(())
            } else {
                Err(SqlError::InvalidIdentifier(name.to_string()))
            }
        };

        check(&self.table)?;
        for field in &self.fields {
            check(field)?;
        }

        let mut sql = String::new();
        let mut params = Vec::new();

        let select = if self.fields.is_empty() {
            "*".to_string()
        } else {
            self.fields.join(", ")
        };
        sql.push_str(&format!("SELECT {select} FROM {}", self.table));

        if !self.filters.is_empty() {
            let mut conditions = Vec::with_capacity(self.filters.len());
            for filter in &self.filters {
                conditions.push(self.render_predicate(filter, &mut params)?);
            }
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        if !self.order.is_empty() {
            let mut parts = Vec::with_capacity(self.order.len());
            for (column, direction) in &self.order {
                check(column)?;
                parts.push(format!("{column} {}", direction.as_sql()));
            }
            sql.push_str(" ORDER BY ");
            sql.push_str(&parts.join(", "));
        }

        match self.limit {
            Some(limit) => sql.push_str(&format!(" LIMIT {limit}")),
            None if self.offset > 0 => {
                sql.push(' ');
                sql.push_str(self.dialect.unbounded_limit());
            }
            None => {}
        }
        if self.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", self.offset));
        }

        Ok(Statement { sql, params })
    }

    fn render_predicate(
        &self,
        predicate: &Predicate,
        params: &mut Vec<Value>,
    ) -> Result<String, SqlError<C::Error>> {
        match predicate {
            Predicate::Compare { column, op, param } => {
                if !is_valid_sql_identifier(column) {
                    return Err(SqlError::InvalidIdentifier(column.clone()));
                }
                let value = self
                    .params
                    .get(param)
                    .ok_or_else(|| SqlError::UnboundParameter(param.clone()))?;
                Ok(match (op, value) {
                    (Comparison::Eq, Value::Null) => format!("{column} IS NULL"),
                    (Comparison::Ne, Value::Null) => format!("{column} IS NOT NULL"),
                    _ => {
                        params.push(value.clone());
                        format!("{column} {op} {}", self.dialect.param(params.len()))
                    }
                })
            }
            Predicate::And(inner) | Predicate::Or(inner) => {
                let (joiner, empty) = if matches!(predicate, Predicate::And(_)) {
                    (" AND ", "1=1")
                } else {
                    (" OR ", "1=0")
                };
                let mut conditions = Vec::with_capacity(inner.len());
                for p in inner {
                    conditions.push(self.render_predicate(p, params)?);
                }
                Ok(match conditions.len() {
                    0 => empty.to_string(),
                    1 => conditions.swap_remove(0),
                    _ => format!("({})", conditions.join(joiner)),
                })
            }
        }
    }
}

impl<D: Dialect, C: Connection + Clone> Query for SqlQuery<D, C> {
    type Error = SqlError<C::Error>;

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
        let statement = self.build()?;
        trace!(
            target: "mik_paginate::sql",
            dialect = self.dialect.name(),
            sql = %statement.sql,
            params = statement.params.len(),
            "executing statement"
        );
        self.connection
            .fetch_all(&statement)
            .map_err(SqlError::Connection)
    }
}
