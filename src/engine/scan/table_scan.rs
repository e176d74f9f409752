use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info, warn};

use super::{
    CancellationToken, ColumnVsColumnScan, ColumnVsValueScan, ScanPredicate,
    build_reference_table, run_per_chunk,
};
use crate::engine::core::chunk::{ChunkData, PositionList};
use crate::engine::core::table::Table;
use crate::engine::errors::ScanError;
use crate::engine::types::{ChunkId, ChunkOffset, RowId};
use crate::shared::config::CONFIG;

#[derive(Debug)]
enum ScanImpl {
    ColumnVsValue(ColumnVsValueScan),
    ColumnVsColumn(ColumnVsColumnScan),
}

/// Filters a table with one predicate and outputs a reference table of the
/// matching rows.
#[derive(Debug)]
pub struct TableScan {
    input: Arc<Table>,
    predicate: ScanPredicate,
    scan: ScanImpl,
    cancellation: CancellationToken,
    parallel_threshold: usize,
    binary_searched_chunks: AtomicUsize,
}

impl TableScan {
    /// Validates the predicate against the input schema.
    pub fn new(input: Arc<Table>, predicate: ScanPredicate) -> Result<Self, ScanError> {
        let scan = match &predicate {
            ScanPredicate::ColumnVsValue {
                column_id,
                condition,
                value,
            } => ScanImpl::ColumnVsValue(ColumnVsValueScan::new(
                &input,
                *column_id,
                *condition,
                value.clone(),
            )?),
            ScanPredicate::ColumnVsColumn {
                left_column_id,
                condition,
                right_column_id,
            } => ScanImpl::ColumnVsColumn(ColumnVsColumnScan::new(
                &input,
                *left_column_id,
                *condition,
                *right_column_id,
            )?),
        };
        Ok(Self {
            input,
            predicate,
            scan,
            cancellation: CancellationToken::new(),
            parallel_threshold: CONFIG.scan.parallel_chunk_threshold,
            binary_searched_chunks: AtomicUsize::new(0),
        })
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Minimum chunk count before chunks are scanned in parallel.
    pub fn with_parallel_threshold(mut self, chunks: usize) -> Self {
        self.parallel_threshold = chunks;
        self
    }

    pub fn input(&self) -> &Arc<Table> {
        &self.input
    }

    pub fn predicate(&self) -> &ScanPredicate {
        &self.predicate
    }

    fn scan_data(&self, data: &ChunkData) -> Result<Vec<ChunkOffset>, ScanError> {
        match &self.scan {
            ScanImpl::ColumnVsValue(scan) => {
                if scan.can_use_binary_search(data) {
                    self.binary_searched_chunks.fetch_add(1, Ordering::Relaxed);
                }
                scan.scan_chunk(data)
            }
            ScanImpl::ColumnVsColumn(scan) => scan.scan_chunk(data),
        }
    }

    /// Positions of the input rows of one chunk that satisfy the predicate.
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

    /// One position list per input chunk, in chunk order.
    pub fn matching_positions(&self) -> Result<Vec<PositionList>, ScanError> {
        let matches = self.chunk_matches()?;
        Ok(matches
            .into_iter()
            .map(|(chunk_id, offsets)| {
                offsets
                    .into_iter()
                    .map(|offset| RowId::new(chunk_id, offset))
                    .collect()
            })
            .collect())
    }

    fn chunk_matches(&self) -> Result<Vec<(ChunkId, Vec<ChunkOffset>)>, ScanError> {
        self.binary_searched_chunks.store(0, Ordering::Relaxed);
        let chunks = self.input.chunks();
        run_per_chunk(
            &chunks,
            self.parallel_threshold,
            &self.cancellation,
            |chunk_id, chunk| {
                // One snapshot per chunk: the scan never sees a half-swapped
                // segment set.
                let data = chunk.snapshot();
                Ok((chunk_id, self.scan_data(&data)?))
            },
        )
    }

    /// Runs the scan over all chunks.
    pub fn execute(&self) -> Result<Arc<Table>, ScanError> {
        let matches = self.chunk_matches().inspect_err(|e| e.log_error())?;
        let matched: usize = matches.iter().map(|(_, offsets)| offsets.len()).sum();
        if matched == 0 {
            warn!(target: "strata::scan", predicate = %self.predicate, "Scan matched no rows");
        }
        let output = build_reference_table(&self.input, matches)?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(
                target: "strata::scan",
                predicate = %self.predicate,
                input_rows = self.input.row_count(),
                matched,
                binary_searched_chunks = self.binary_searched_chunks.load(Ordering::Relaxed),
                "Table scan finished"
            );
        }
        info!(target: "strata::scan", description = %self.description(), matched, "Scan executed");
        Ok(output)
    }

    /// Human-readable summary; notes when sorted chunks were binary searched
    /// during the last execution.
    pub fn description(&self) -> String {
        let mut description = format!("TableScan {}", self.predicate);
        let searched = self.binary_searched_chunks.load(Ordering::Relaxed);
        if searched > 0 {
            description.push_str(&format!(" (binary search on {searched} sorted chunk(s))"));
        }
        description
    }
}
