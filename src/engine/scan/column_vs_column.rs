use tracing::debug;

use super::PredicateCondition;
use crate::engine::core::chunk::ChunkData;
use crate::engine::core::segment::Segment;
use crate::engine::core::table::Table;
use crate::engine::errors::{ScanError, TableError};
use crate::engine::types::{ChunkOffset, ColumnId, ColumnType, DataType, resolve_data_type};

/// `left op right` between two columns of the same table.
#[derive(Debug, Clone)]
pub struct ColumnVsColumnScan {
    left_column_id: ColumnId,
    condition: PredicateCondition,
    right_column_id: ColumnId,
}

impl ColumnVsColumnScan {
    /// Rejects string-vs-numeric comparisons up front.
    pub fn new(
        table: &Table,
        left_column_id: ColumnId,
        condition: PredicateCondition,
        right_column_id: ColumnId,
    ) -> Result<Self, ScanError> {
        let left_type = table
            .column_data_type(left_column_id)
            .ok_or(ScanError::ColumnOutOfRange(left_column_id))?;
        let right_type = table
            .column_data_type(right_column_id)
            .ok_or(ScanError::ColumnOutOfRange(right_column_id))?;
        let scan = Self {
            left_column_id,
            condition,
            right_column_id,
        };
        scan.check_types(left_type, right_type)?;
        Ok(scan)
    }

    fn check_types(&self, left_type: DataType, right_type: DataType) -> Result<(), ScanError> {
        if left_type.is_comparable_with(right_type) {
            Ok(())
        } else {
            Err(ScanError::IncompatibleTypes {
                left_column: self.left_column_id,
                left_type,
                right_column: self.right_column_id,
                right_type,
            })
        }
    }

    /// Reference segments pair only with reference segments, data segments
    /// only with data segments.
    fn check_pairing(&self, left: &Segment, right: &Segment) -> Result<(), ScanError> {
        if left.is_reference() == right.is_reference() {
            Ok(())
        } else {
            Err(ScanError::InvalidSegmentPairing {
                left_column: self.left_column_id,
                left_kind: left.kind(),
                right_column: self.right_column_id,
                right_kind: right.kind(),
            })
        }
    }

    pub fn scan_chunk(&self, data: &ChunkData) -> Result<Vec<ChunkOffset>, ScanError> {
        let left = data
            .segment(self.left_column_id)
            .ok_or(ScanError::ColumnOutOfRange(self.left_column_id))?;
        let right = data
            .segment(self.right_column_id)
            .ok_or(ScanError::ColumnOutOfRange(self.right_column_id))?;
        self.scan_segments(left, right)
    }

    /// Walks both segments in lockstep. A null on either side never matches.
    pub fn scan_segments(
        &self,
        left: &Segment,
        right: &Segment,
    ) -> Result<Vec<ChunkOffset>, ScanError> {
        self.check_pairing(left, right)?;
        self.check_types(left.data_type(), right.data_type())?;
        if left.len() != right.len() {
            return Err(TableError::InvalidChunk(format!(
                "column {} has {} rows, column {} has {}",
                self.left_column_id,
                left.len(),
                self.right_column_id,
                right.len()
            ))
            .into());
        }

        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(
                target: "strata::scan",
                left_type = %left.data_type(),
                left_encoding = ?left.encoding_type(),
                right_type = %right.data_type(),
                right_encoding = ?right.encoding_type(),
                condition = %self.condition,
                "Column-vs-column scan"
            );
        }

        let condition = self.condition;
        resolve_data_type!(left.data_type(), L => {
            resolve_data_type!(right.data_type(), R => {
                scan_zipped::<L, R>(left, right, condition)
            })
        })
    }
}

fn scan_zipped<L: ColumnType, R: ColumnType>(
    left: &Segment,
    right: &Segment,
    condition: PredicateCondition,
) -> Result<Vec<ChunkOffset>, ScanError> {
    let mut matches = Vec::new();
    for (l, r) in left.iter::<L>()?.zip(right.iter::<R>()?) {
        if l.is_null() || r.is_null() {
            continue;
        }
        if condition.evaluate(l.value().scalar().partial_cmp(&r.value().scalar())) {
            matches.push(l.chunk_offset());
        }
    }
    Ok(matches)
}
