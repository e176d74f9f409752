use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::engine::types::{ColumnId, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PredicateCondition {
    Equals,
    NotEquals,
    LessThan,
    LessThanEquals,
    GreaterThan,
    GreaterThanEquals,
}

impl PredicateCondition {
    pub const ALL: [PredicateCondition; 6] = [
        PredicateCondition::Equals,
        PredicateCondition::NotEquals,
        PredicateCondition::LessThan,
        PredicateCondition::LessThanEquals,
        PredicateCondition::GreaterThan,
        PredicateCondition::GreaterThanEquals,
    ];

    /// Applies the operator to `left.partial_cmp(right)`. Incomparable
    /// operands never match.
    #[inline]
    pub fn evaluate(self, ordering: Option<Ordering>) -> bool {
        let Some(ordering) = ordering else {
            return false;
        };
        match self {
            PredicateCondition::Equals => ordering == Ordering::Equal,
            PredicateCondition::NotEquals => ordering != Ordering::Equal,
            PredicateCondition::LessThan => ordering == Ordering::Less,
            PredicateCondition::LessThanEquals => ordering != Ordering::Greater,
            PredicateCondition::GreaterThan => ordering == Ordering::Greater,
            PredicateCondition::GreaterThanEquals => ordering != Ordering::Less,
        }
    }

    /// Operator with the operands swapped: `a < b` is `b > a`.
    pub fn flip(self) -> Self {
        match self {
            PredicateCondition::LessThan => PredicateCondition::GreaterThan,
            PredicateCondition::LessThanEquals => PredicateCondition::GreaterThanEquals,
            PredicateCondition::GreaterThan => PredicateCondition::LessThan,
            PredicateCondition::GreaterThanEquals => PredicateCondition::LessThanEquals,
            other => other,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            PredicateCondition::Equals => "=",
            PredicateCondition::NotEquals => "!=",
            PredicateCondition::LessThan => "<",
            PredicateCondition::LessThanEquals => "<=",
            PredicateCondition::GreaterThan => ">",
            PredicateCondition::GreaterThanEquals => ">=",
        }
    }
}

impl fmt::Display for PredicateCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ScanPredicate {
    ColumnVsValue {
        column_id: ColumnId,
        condition: PredicateCondition,
        value: Value,
    },
    ColumnVsColumn {
        left_column_id: ColumnId,
        condition: PredicateCondition,
        right_column_id: ColumnId,
    },
}

impl ScanPredicate {
    pub fn column_vs_value(
        column_id: ColumnId,
        condition: PredicateCondition,
        value: impl Into<Value>,
    ) -> Self {
        ScanPredicate::ColumnVsValue {
            column_id,
            condition,
            value: value.into(),
        }
    }

    pub fn column_vs_column(
        left_column_id: ColumnId,
        condition: PredicateCondition,
        right_column_id: ColumnId,
    ) -> Self {
        ScanPredicate::ColumnVsColumn {
            left_column_id,
            condition,
            right_column_id,
        }
    }

    pub fn condition(&self) -> PredicateCondition {
        match self {
            ScanPredicate::ColumnVsValue { condition, .. }
            | ScanPredicate::ColumnVsColumn { condition, .. } => *condition,
        }
    }
}

impl fmt::Display for ScanPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanPredicate::ColumnVsValue {
                column_id,
                condition,
                value,
            } => write!(f, "#{column_id} {condition} {value}"),
            ScanPredicate::ColumnVsColumn {
                left_column_id,
                condition,
                right_column_id,
            } => write!(f, "#{left_column_id} {condition} #{right_column_id}"),
        }
    }
}
