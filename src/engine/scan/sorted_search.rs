use std::cmp::Ordering;
use std::ops::Range;

use super::PredicateCondition;
use crate::engine::core::segment::{Segment, SegmentAccessor};
use crate::engine::errors::ScanError;
use crate::engine::types::{ChunkOffset, ColumnType, OrderByMode, Scalar, Value, resolve_data_type};

/// Binary search over a segment sorted under `mode`.
///
/// Returns exactly the offsets a linear scan of `segment op literal` would,
/// in ascending order. Null rows sit at one end of a sorted segment and are
/// cut off first; rows that compare with nothing (NaN) sit at the very ends
/// and are cut off too.
pub fn sorted_range_search(
    segment: &Segment,
    mode: OrderByMode,
    condition: PredicateCondition,
    literal: &Value,
) -> Result<Vec<ChunkOffset>, ScanError> {
    let Some(literal) = literal.as_scalar() else {
        return Ok(Vec::new());
    };
    resolve_data_type!(segment.data_type(), T => {
        let typed = segment.typed::<T>()?;
        let mut accessor = typed.accessor()?;
        let ranges = matching_ranges::<T>(&mut accessor, typed.len(), mode, condition, literal);
        Ok(ranges
            .into_iter()
            .flat_map(|range| range.start as ChunkOffset..range.end as ChunkOffset)
            .collect())
    })
}

fn matching_ranges<T: ColumnType>(
    accessor: &mut SegmentAccessor<'_, T>,
    len: usize,
    mode: OrderByMode,
    condition: PredicateCondition,
    literal: Scalar<'_>,
) -> Vec<Range<usize>> {
    let (mut lo, mut hi) = if mode.nulls_first() {
        (partition_point(0, len, |i| accessor.get(i).is_none()), len)
    } else {
        (0, partition_point(0, len, |i| accessor.get(i).is_some()))
    };

    let mut compare = |i: usize| -> Option<Ordering> {
        accessor
            .get(i)
            .and_then(|value| value.scalar().partial_cmp(&literal))
    };
    let incomparable = |ordering: Option<Ordering>| ordering.is_none();
    while lo < hi && incomparable(compare(lo)) {
        lo += 1;
    }
    while hi > lo && incomparable(compare(hi - 1)) {
        hi -= 1;
    }

    // `first_not_before` is the first row at or past the literal in sort
    // order, `first_after` the first row strictly past it.
    let (first_not_before, first_after) = if mode.is_ascending() {
        (
            partition_point(lo, hi, |i| compare(i) == Some(Ordering::Less)),
            partition_point(lo, hi, |i| compare(i) != Some(Ordering::Greater)),
        )
    } else {
        (
            partition_point(lo, hi, |i| compare(i) == Some(Ordering::Greater)),
            partition_point(lo, hi, |i| compare(i) != Some(Ordering::Less)),
        )
    };
    let (a, b) = (first_not_before, first_after);

    let ranges = match (condition, mode.is_ascending()) {
        (PredicateCondition::Equals, _) => vec![a..b],
        (PredicateCondition::NotEquals, _) => vec![lo..a, b..hi],
        (PredicateCondition::LessThan, true) | (PredicateCondition::GreaterThan, false) => {
            vec![lo..a]
        }
        (PredicateCondition::LessThanEquals, true)
        | (PredicateCondition::GreaterThanEquals, false) => vec![lo..b],
        (PredicateCondition::GreaterThan, true) | (PredicateCondition::LessThan, false) => {
            vec![b..hi]
        }
        (PredicateCondition::GreaterThanEquals, true)
        | (PredicateCondition::LessThanEquals, false) => vec![a..hi],
    };
    ranges.into_iter().filter(|r| !r.is_empty()).collect()
}

/// First index in `lo..hi` for which `pred` is false; `pred` must be true
/// on a prefix of the range and false on the rest.
fn partition_point(mut lo: usize, mut hi: usize, mut pred: impl FnMut(usize) -> bool) -> usize {
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(mid) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}
