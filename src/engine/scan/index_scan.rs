use std::sync::Arc;

use tracing::debug;

use super::{CancellationToken, PredicateCondition, build_reference_table, run_per_chunk};
use crate::engine::core::chunk::{ChunkData, PositionList};
use crate::engine::core::index::IndexKind;
use crate::engine::core::table::Table;
use crate::engine::errors::{IndexError, ScanError};
use crate::engine::types::{ChunkId, ChunkOffset, ColumnId, RowId, Value};
use crate::shared::config::CONFIG;

/// Answers a predicate from the chunks' indexes instead of their values.
///
/// Every scanned segment must carry the encoding the index kind is built
/// on; a mismatch is reported, never answered by a full scan.
#[derive(Debug)]
pub struct IndexScan {
    input: Arc<Table>,
    index_kind: IndexKind,
    column_ids: Vec<ColumnId>,
    condition: PredicateCondition,
    values: Vec<Value>,
    cancellation: CancellationToken,
    parallel_threshold: usize,
}

impl IndexScan {
    pub fn new(
        input: Arc<Table>,
        index_kind: IndexKind,
        column_ids: Vec<ColumnId>,
        condition: PredicateCondition,
        values: Vec<Value>,
    ) -> Result<Self, ScanError> {
        for &column_id in &column_ids {
            let data_type = input
                .column_data_type(column_id)
                .ok_or(ScanError::ColumnOutOfRange(column_id))?;
            if let Some(value) = values.iter().find(|v| !v.is_comparable_with(data_type)) {
                return Err(IndexError::IncompatibleValue {
                    data_type,
                    value: value.clone(),
                }
                .into());
            }
        }
        Ok(Self {
            input,
            index_kind,
            column_ids,
            condition,
            values,
            cancellation: CancellationToken::new(),
            parallel_threshold: CONFIG.scan.parallel_chunk_threshold,
        })
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    fn scan_data(&self, data: &ChunkData) -> Result<Vec<ChunkOffset>, ScanError> {
        let expected = self.index_kind.supported_encoding();
        for &column_id in &self.column_ids {
            let segment = data
                .segment(column_id)
                .ok_or(ScanError::ColumnOutOfRange(column_id))?;
            if segment.encoding_type() != Some(expected) {
                return Err(IndexError::EncodingMismatch {
                    column_id,
                    expected,
                    actual: segment
                        .encoding_type()
                        .map_or_else(|| "Reference".to_string(), |e| e.to_string()),
                }
                .into());
            }
        }

        let index = data
            .index_for(&self.column_ids)
            .filter(|index| index.kind() == self.index_kind)
            .ok_or_else(|| IndexError::MissingIndex {
                columns: self.column_ids.clone(),
            })?;
        Ok(index.lookup(self.condition, &self.values)?)
    }

    pub fn scan_chunk(&self, chunk_id: ChunkId) -> Result<PositionList, ScanError> {
        let chunk = self
            .input
            .get_chunk(chunk_id)
            .ok_or(ScanError::ChunkOutOfRange(chunk_id))?;
        let offsets = self.scan_data(&chunk.snapshot())?;
        Ok(offsets
            .into_iter()
            .map(|offset| RowId::new(chunk_id, offset))
            .collect())
    }

    pub fn execute(&self) -> Result<Arc<Table>, ScanError> {
        let chunks = self.input.chunks();
        let matches = run_per_chunk(
            &chunks,
            self.parallel_threshold,
            &self.cancellation,
            |chunk_id, chunk| Ok((chunk_id, self.scan_data(&chunk.snapshot())?)),
        )
        .inspect_err(|e| e.log_error())?;

        debug!(
            target: "strata::scan",
            index = %self.index_kind,
            columns = ?self.column_ids,
            condition = %self.condition,
            matched = matches.iter().map(|(_, m)| m.len()).sum::<usize>(),
            "Index scan finished"
        );
        build_reference_table(&self.input, matches)
    }
}
