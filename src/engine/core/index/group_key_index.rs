use std::cmp::Ordering;
use std::ops::Range;

use super::{ChunkIndex, IndexKind};
use crate::engine::core::segment::{EncodingType, Segment, TypedSegment};
use crate::engine::core::vector::CompressedVector;
use crate::engine::errors::IndexError;
use crate::engine::scan::PredicateCondition;
use crate::engine::types::{ChunkOffset, ColumnId, ColumnType, DataType, Value, resolve_data_type};

/// Postings per dictionary value id of one dictionary segment.
///
/// `value_start_offsets[id]..value_start_offsets[id + 1]` slices the offsets
/// of all rows holding value id `id`. Null rows are not indexed.
#[derive(Debug, Clone)]
pub struct GroupKeyIndex {
    columns: [ColumnId; 1],
    data_type: DataType,
    dictionary: Vec<Value>,
    value_start_offsets: Vec<u32>,
    positions: Vec<ChunkOffset>,
}

impl GroupKeyIndex {
    pub fn build(column_id: ColumnId, segment: &Segment) -> Result<Self, IndexError> {
        let mismatch = || IndexError::EncodingMismatch {
            column_id,
            expected: EncodingType::Dictionary,
            actual: segment
                .encoding_type()
                .map_or_else(|| "Reference".to_string(), |e| e.to_string()),
        };
        let data_type = segment.data_type();
        resolve_data_type!(data_type, T => {
            match segment.typed::<T>() {
                Ok(TypedSegment::Dictionary(dictionary)) => Ok(build_typed::<T>(
                    column_id,
                    data_type,
                    dictionary.dictionary(),
                    dictionary.null_value_id(),
                    dictionary.attribute_vector(),
                )),
                _ => Err(mismatch()),
            }
        })
    }

    pub fn dictionary(&self) -> &[Value] {
        &self.dictionary
    }

    /// Value ids whose entries compare with `value`. NaN entries sort to
    /// both ends of the dictionary and are left out.
    fn comparable_ids(&self, value: &Value) -> Range<usize> {
        let comparable = |entry: &Value| entry.compare(value).is_some();
        let start = self
            .dictionary
            .iter()
            .position(comparable)
            .unwrap_or(self.dictionary.len());
        let end = self
            .dictionary
            .iter()
            .rposition(comparable)
            .map_or(start, |last| last + 1);
        start..end
    }

    fn value_id_ranges(&self, condition: PredicateCondition, value: &Value) -> Vec<Range<usize>> {
        // A literal that compares with nothing (NaN) matches no row.
        if value.compare(value).is_none() {
            return Vec::new();
        }
        let ids = self.comparable_ids(value);
        let entries = &self.dictionary[ids.clone()];
        let lower = ids.start
            + entries.partition_point(|entry| entry.compare(value) == Some(Ordering::Less));
        let upper = ids.start
            + entries.partition_point(|entry| {
                matches!(entry.compare(value), Some(Ordering::Less | Ordering::Equal))
            });
        let (first, end) = (ids.start, ids.end);
        match condition {
            PredicateCondition::Equals => vec![lower..upper],
            PredicateCondition::NotEquals => vec![first..lower, upper..end],
            PredicateCondition::LessThan => vec![first..lower],
            PredicateCondition::LessThanEquals => vec![first..upper],
            PredicateCondition::GreaterThan => vec![upper..end],
            PredicateCondition::GreaterThanEquals => vec![lower..end],
        }
    }
}

fn build_typed<T: ColumnType>(
    column_id: ColumnId,
    data_type: DataType,
    dictionary: &[T],
    null_value_id: u32,
    value_ids: &CompressedVector,
) -> GroupKeyIndex {
    // Counting sort over value ids; the null id is the last bucket and is
    // dropped from the postings.
    let buckets = null_value_id as usize + 1;
    let mut counts = vec![0u32; buckets + 1];
    for id in value_ids.iter() {
        counts[id as usize + 1] += 1;
    }
    for i in 1..counts.len() {
        counts[i] += counts[i - 1];
    }
    let mut cursor = counts.clone();
    let mut positions = vec![0 as ChunkOffset; counts[buckets] as usize];
    for (offset, id) in value_ids.iter().enumerate() {
        let slot = &mut cursor[id as usize];
        positions[*slot as usize] = offset as ChunkOffset;
        *slot += 1;
    }

    let indexed = counts[null_value_id as usize] as usize;
    positions.truncate(indexed);
    counts.truncate(buckets);

    GroupKeyIndex {
        columns: [column_id],
        data_type,
        dictionary: dictionary.iter().cloned().map(T::into_value).collect(),
        value_start_offsets: counts,
        positions,
    }
}

impl ChunkIndex for GroupKeyIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::GroupKey
    }

    fn columns(&self) -> &[ColumnId] {
        &self.columns
    }

    fn lookup(
        &self,
        condition: PredicateCondition,
        values: &[Value],
    ) -> Result<Vec<ChunkOffset>, IndexError> {
        let [value] = values else {
            return Err(IndexError::InvalidValueCount {
                expected: 1,
                actual: values.len(),
            });
        };
        if value.is_null() {
            return Ok(Vec::new());
        }
        if !value.is_comparable_with(self.data_type) {
            return Err(IndexError::IncompatibleValue {
                data_type: self.data_type,
                value: value.clone(),
            });
        }

        let mut offsets = Vec::new();
        for range in self.value_id_ranges(condition, value) {
            if range.is_empty() {
                continue;
            }
            let start = self.value_start_offsets[range.start] as usize;
            let end = self.value_start_offsets[range.end] as usize;
            offsets.extend_from_slice(&self.positions[start..end]);
        }
        offsets.sort_unstable();
        Ok(offsets)
    }

    fn memory_consumption(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.dictionary.capacity() * std::mem::size_of::<Value>()
            + self.value_start_offsets.capacity() * std::mem::size_of::<u32>()
            + self.positions.capacity() * std::mem::size_of::<ChunkOffset>()
    }
}
