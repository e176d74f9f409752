use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// Sort order of a chunk column. The plain modes place nulls first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OrderByMode {
    Ascending,
    Descending,
    AscendingNullsLast,
    DescendingNullsLast,
}

impl OrderByMode {
    #[inline]
    pub fn is_ascending(&self) -> bool {
        matches!(self, OrderByMode::Ascending | OrderByMode::AscendingNullsLast)
    }

    #[inline]
    pub fn nulls_first(&self) -> bool {
        matches!(self, OrderByMode::Ascending | OrderByMode::Descending)
    }

    /// Orders two optional values the way this mode lays them out.
    pub fn compare<T, F>(&self, left: Option<&T>, right: Option<&T>, cmp: F) -> Ordering
    where
        F: Fn(&T, &T) -> Ordering,
    {
        match (left, right) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) if self.nulls_first() => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) if self.nulls_first() => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(l), Some(r)) if self.is_ascending() => cmp(l, r),
            (Some(l), Some(r)) => cmp(r, l),
        }
    }
}

impl fmt::Display for OrderByMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderByMode::Ascending => "Ascending",
            OrderByMode::Descending => "Descending",
            OrderByMode::AscendingNullsLast => "AscendingNullsLast",
            OrderByMode::DescendingNullsLast => "DescendingNullsLast",
        };
        f.write_str(name)
    }
}
