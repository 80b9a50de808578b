//! Filter predicates with named parameters.

use std::cmp::Ordering;
use std::fmt;

use super::value::{Row, Value};

/// Binary comparison between a column and a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
}

impl Comparison {
    /// SQL operator text.
    #[inline]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }

    /// Evaluate the comparison with SQL semantics: anything against `NULL` is false.
    pub fn test(self, left: &Value, right: &Value) -> bool {
        if left.is_null() || right.is_null() {
            return false;
        }
        let ord = left.total_cmp(right);
        match self {
            Self::Eq => ord == Ordering::Equal,
            Self::Ne => ord != Ordering::Equal,
            Self::Gt => ord == Ordering::Greater,
            Self::Gte => ord != Ordering::Less,
            Self::Lt => ord == Ordering::Less,
            Self::Lte => ord != Ordering::Greater,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A boolean filter over row columns.
///
/// Comparisons never embed values directly; they name a parameter bound
/// separately through [`Query::set_parameter`](super::Query::set_parameter).
///
/// ```
/// use mik_paginate::{Comparison, Predicate};
///
/// let keyset = Predicate::or(vec![
///     Predicate::compare("nonUniqueCol", Comparison::Gt, "primaryValue"),
///     Predicate::and(vec![
///         Predicate::compare("nonUniqueCol", Comparison::Eq, "primaryValue"),
///         Predicate::compare("uniqueCol", Comparison::Gt, "backupValue"),
///     ]),
/// ]);
/// assert_eq!(
///     keyset.to_string(),
///     "(nonUniqueCol > :primaryValue OR (nonUniqueCol = :primaryValue AND uniqueCol > :backupValue))"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `column <op> :param`
    Compare {
        /// Column name.
        column: String,
        /// Operator.
        op: Comparison,
        /// Parameter name, without the leading colon.
        param: String,
    },
    /// All sub-predicates hold. Empty is true.
    And(Vec<Predicate>),
    /// Any sub-predicate holds. Empty is false.
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Build a single comparison.
    pub fn compare(column: impl Into<String>, op: Comparison, param: impl Into<String>) -> Self {
        Self::Compare {
            column: column.into(),
            op,
            param: param.into(),
        }
    }

    /// Conjunction.
    pub const fn and(predicates: Vec<Self>) -> Self {
        Self::And(predicates)
    }

    /// Disjunction.
    pub const fn or(predicates: Vec<Self>) -> Self {
        Self::Or(predicates)
    }

    /// Evaluate against a row. `lookup` resolves parameter names; the first
    /// unresolved name is returned as the error. Missing columns read as `NULL`.
    pub fn evaluate<'a, 'v>(
        &'a self,
        row: &Row,
        lookup: &impl Fn(&str) -> Option<&'v Value>,
    ) -> Result<bool, &'a str> {
        match self {
            Self::Compare { column, op, param } => {
                let right = lookup(param).ok_or(param.as_str())?;
                let left = row.get(column).unwrap_or(&Value::Null);
                Ok(op.test(left, right))
            }
            Self::And(inner) => {
                for p in inner {
                    if !p.evaluate(row, lookup)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Self::Or(inner) => {
                for p in inner {
                    if p.evaluate(row, lookup)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare { column, op, param } => write!(f, "{column} {op} :{param}"),
            Self::And(inner) | Self::Or(inner) if inner.is_empty() => {
                f.write_str(if matches!(self, Self::And(_)) { "TRUE" } else { "FALSE" })
            }
            Self::And(inner) | Self::Or(inner) if inner.len() == 1 => write!(f, "{}", inner[0]),
            Self::And(inner) | Self::Or(inner) => {
                let joiner = if matches!(self, Self::And(_)) { " AND " } else { " OR " };
                f.write_str("(")?;
                for (i, p) in inner.iter().enumerate() {
                    if i > 0 {
                        f.write_str(joiner)?;
                    }
                    write!(f, "{p}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(name: &str) -> Option<&'static Value> {
        static FIVE: Value = Value::Int(5);
        static NULL: Value = Value::Null;
        match name {
            "five" => Some(&FIVE),
            "nothing" => Some(&NULL),
            _ => None,
        }
    }

    #[test]
    fn test_comparison_with_null_is_false() {
        for op in [
            Comparison::Eq,
            Comparison::Ne,
            Comparison::Gt,
            Comparison::Gte,
            Comparison::Lt,
            Comparison::Lte,
        ] {
            assert!(!op.test(&Value::Null, &Value::Int(1)), "{op}");
            assert!(!op.test(&Value::Int(1), &Value::Null), "{op}");
        }
    }

    #[test]
    fn test_comparison_operators() {
        let (a, b) = (Value::Int(3), Value::Int(5));
        assert!(Comparison::Lt.test(&a, &b));
        assert!(Comparison::Lte.test(&a, &a));
        assert!(Comparison::Ne.test(&a, &b));
        assert!(!Comparison::Gt.test(&a, &b));
        assert!(Comparison::Gte.test(&b, &a));
    }

    #[test]
    fn test_evaluate_tree() {
        let row = Row::new().with("n", 5).with("m", 7);
        let p = Predicate::or(vec![
            Predicate::compare("n", Comparison::Gt, "five"),
            Predicate::and(vec![
                Predicate::compare("n", Comparison::Eq, "five"),
                Predicate::compare("m", Comparison::Gt, "five"),
            ]),
        ]);
        assert_eq!(p.evaluate(&row, &params), Ok(true));

        let row = Row::new().with("n", 5).with("m", 2);
        assert_eq!(p.evaluate(&row, &params), Ok(false));
    }

    #[test]
    fn test_evaluate_missing_column_is_null() {
        let row = Row::new();
        let p = Predicate::compare("absent", Comparison::Ne, "five");
        assert_eq!(p.evaluate(&row, &params), Ok(false));
    }

    #[test]
    fn test_evaluate_unbound_parameter() {
        let row = Row::new().with("n", 1);
        let p = Predicate::and(vec![Predicate::compare("n", Comparison::Eq, "missing")]);
        assert_eq!(p.evaluate(&row, &params), Err("missing"));
    }

    #[test]
    fn test_empty_groups() {
        let row = Row::new();
        assert_eq!(Predicate::and(vec![]).evaluate(&row, &params), Ok(true));
        assert_eq!(Predicate::or(vec![]).evaluate(&row, &params), Ok(false));
        assert_eq!(Predicate::and(vec![]).to_string(), "TRUE");
    }
}
