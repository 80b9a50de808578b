//! Keyset predicate and ordering for one traversal direction.

use crate::query::{Comparison, Predicate, Query, Value};
use crate::sort::{SortDirection, SortSpec};

/// Parameter bound to the boundary's primary value.
pub const PRIMARY_PARAM: &str = "primaryValue";

/// Parameter bound to the boundary's backup value.
pub const BACKUP_PARAM: &str = "backupValue";

/// Which way a scan moves through the logical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Motion {
    Forward,
    Backward,
}

impl Motion {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }
}

/// Restricts a query to rows strictly beyond a boundary key in one direction.
///
/// For sort `(p, b)` moving forward through an ascending order this is
/// `p > :primaryValue OR (p = :primaryValue AND b > :backupValue)`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KeysetCondition<'a> {
    primary: &'a SortSpec,
    backup: &'a SortSpec,
    motion: Motion,
}

impl<'a> KeysetCondition<'a> {
    pub(crate) const fn new(primary: &'a SortSpec, backup: &'a SortSpec, motion: Motion) -> Self {
        Self {
            primary,
            backup,
            motion,
        }
    }

    /// Comparison pointing further along the traversal for a column sorted `dir`.
    fn operator(self, dir: SortDirection) -> Comparison {
        match (self.motion, dir) {
            (Motion::Forward, SortDirection::Ascending) => Comparison::Gt,
            (Motion::Forward, SortDirection::Descending) => Comparison::Lt,
            (Motion::Backward, SortDirection::Ascending) => Comparison::Lt,
            (Motion::Backward, SortDirection::Descending) => Comparison::Gt,
        }
    }

    pub(crate) fn to_predicate(self) -> Predicate {
        let primary = self.primary.column();
        Predicate::or(vec![
            Predicate::compare(primary, self.operator(self.primary.direction()), PRIMARY_PARAM),
            Predicate::and(vec![
                Predicate::compare(primary, Comparison::Eq, PRIMARY_PARAM),
                Predicate::compare(
                    self.backup.column(),
                    self.operator(self.backup.direction()),
                    BACKUP_PARAM,
                ),
            ]),
        ])
    }

    /// Add the predicate and bind the boundary values.
    pub(crate) fn constrain<Q: Query>(self, query: &mut Q, (primary, backup): (Value, Value)) {
        query.add_filter(self.to_predicate());
        query.set_parameter(PRIMARY_PARAM, primary);
        query.set_parameter(BACKUP_PARAM, backup);
    }

    /// Order in scan direction: as configured forward, inverted backward.
    pub(crate) fn order<Q: Query>(self, query: &mut Q) {
        let (primary, backup) = match self.motion {
            Motion::Forward => (self.primary.direction(), self.backup.direction()),
            Motion::Backward => (
                self.primary.direction().inverse(),
                self.backup.direction().inverse(),
            ),
        };
        query.order_by(self.primary.column(), primary);
        query.add_order_by(self.backup.column(), backup);
    }
}
