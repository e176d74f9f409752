use tracing::trace;

use super::{PredicateCondition, sorted_range_search};
use crate::engine::core::chunk::ChunkData;
use crate::engine::core::segment::Segment;
use crate::engine::core::table::Table;
use crate::engine::errors::ScanError;
use crate::engine::types::{ChunkOffset, ColumnId, ColumnType, Value, resolve_data_type};

/// `column op literal` over one chunk at a time.
#[derive(Debug, Clone)]
pub struct ColumnVsValueScan {
    column_id: ColumnId,
    condition: PredicateCondition,
    value: Value,
}

impl ColumnVsValueScan {
    /// Checks the column and the literal against the table schema.
    pub fn new(
        table: &Table,
        column_id: ColumnId,
        condition: PredicateCondition,
        value: Value,
    ) -> Result<Self, ScanError> {
        let data_type = table
            .column_data_type(column_id)
            .ok_or(ScanError::ColumnOutOfRange(column_id))?;
        if !value.is_comparable_with(data_type) {
            return Err(ScanError::IncompatibleLiteral {
                column_id,
                data_type,
                literal: value,
            });
        }
        Ok(Self {
            column_id,
            condition,
            value,
        })
    }

    pub fn column_id(&self) -> ColumnId {
        self.column_id
    }

    /// Whether the chunk is sorted on the scanned column, so that the scan
    /// can binary search instead of reading every row.
    pub fn can_use_binary_search(&self, data: &ChunkData) -> bool {
        let sorted_on_column = data
            .ordered_by()
            .is_some_and(|(column_id, _)| column_id == self.column_id);
        sorted_on_column
            && !self.value.is_null()
            && data.segment(self.column_id).is_some_and(|s| !s.is_reference())
    }

    /// Matching offsets of one chunk, ascending.
    pub fn scan_chunk(&self, data: &ChunkData) -> Result<Vec<ChunkOffset>, ScanError> {
        let segment = data
            .segment(self.column_id)
            .ok_or(ScanError::ColumnOutOfRange(self.column_id))?;
        if self.value.is_null() {
            return Ok(Vec::new());
        }
        match data.ordered_by() {
            Some((column_id, mode)) if self.can_use_binary_search(data) => {
                trace!(
                    target: "strata::scan",
                    column_id,
                    mode = %mode,
                    "Binary search on sorted chunk"
                );
                sorted_range_search(segment, mode, self.condition, &self.value)
            }
            _ => self.scan_segment(segment),
        }
    }

    /// Reads every row of `segment`.
    pub fn scan_segment(&self, segment: &Segment) -> Result<Vec<ChunkOffset>, ScanError> {
        resolve_data_type!(segment.data_type(), T => scan_linear::<T>(segment, self.condition, &self.value))
    }
}

fn scan_linear<T: ColumnType>(
    segment: &Segment,
    condition: PredicateCondition,
    literal: &Value,
) -> Result<Vec<ChunkOffset>, ScanError> {
    let Some(literal) = literal.as_scalar() else {
        return Ok(Vec::new());
    };
    let mut matches = Vec::new();
    for position in segment.iter::<T>()? {
        if position.is_null() {
            continue;
        }
        if condition.evaluate(position.value().scalar().partial_cmp(&literal)) {
            matches.push(position.chunk_offset());
        }
    }
    Ok(matches)
}
