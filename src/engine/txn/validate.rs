use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::RwLockReadGuard;
use tracing::{debug, warn};

use super::TransactionContext;
use crate::engine::core::chunk::{Chunk, PositionList, RowVersion};
use crate::engine::core::table::{Table, TableType};
use crate::engine::errors::{ScanError, TableError};
use crate::engine::scan::{CancellationToken, build_reference_table, run_per_chunk};
use crate::engine::types::{ChunkId, ChunkOffset, CommitId, RowId, TransactionId};
use crate::shared::config::CONFIG;

/// Whether a row version is visible to a transaction.
///
/// A row is never visible once its end id has been passed. Otherwise it is
/// visible either as the transaction's own pending write (it wrote the row
/// and the begin id has not been passed) or as somebody else's committed
/// row (begin id passed). Every input combination has an answer, including
/// ones no transaction sequence produces.
#[inline]
pub fn is_row_visible(
    our_tid: TransactionId,
    snapshot_commit_id: CommitId,
    row_tid: TransactionId,
    begin_cid: CommitId,
    end_cid: CommitId,
) -> bool {
    let ended = snapshot_commit_id >= end_cid;
    let is_own_row = row_tid == our_tid;
    let began = snapshot_commit_id >= begin_cid;
    !ended && (is_own_row != began)
}

impl RowVersion {
    #[inline]
    pub fn is_visible_to(&self, context: &TransactionContext) -> bool {
        is_row_visible(
            context.transaction_id(),
            context.snapshot_commit_id(),
            self.last_writer_tid,
            self.begin_cid,
            self.end_cid,
        )
    }
}

/// Filters a table down to the rows a transaction may see.
#[derive(Debug)]
pub struct Validate {
    input: Arc<Table>,
    context: TransactionContext,
    cancellation: CancellationToken,
    parallel_threshold: usize,
}

impl Validate {
    pub fn new(input: Arc<Table>, context: TransactionContext) -> Self {
        Self {
            input,
            context,
            cancellation: CancellationToken::new(),
            parallel_threshold: CONFIG.scan.parallel_chunk_threshold,
        }
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn with_parallel_threshold(mut self, chunks: usize) -> Self {
        self.parallel_threshold = chunks;
        self
    }

    /// Keeps the positions of `table` visible to `context`, in order.
    pub fn validate_positions(
        table: &Table,
        positions: &PositionList,
        context: &TransactionContext,
    ) -> Result<PositionList, ScanError> {
        let mask = visibility(table, positions.as_slice(), context)?;
        Ok(positions
            .iter()
            .zip(mask)
            .filter_map(|(row, visible)| visible.then_some(*row))
            .collect())
    }

    /// Reference table of the visible input rows. Reference inputs are
    /// checked against the MVCC rows of the data table they point at.
    pub fn execute(&self) -> Result<Arc<Table>, ScanError> {
        if self.input.table_type() == TableType::Data && !self.input.uses_mvcc() {
            let err = ScanError::MissingMvccData;
            err.log_error();
            return Err(err);
        }

        let chunks = self.input.chunks();
        let matches = run_per_chunk(
            &chunks,
            self.parallel_threshold,
            &self.cancellation,
            |chunk_id, chunk| Ok((chunk_id, self.validate_chunk(chunk)?)),
        )
        .inspect_err(|e| e.log_error())?;

        let visible: usize = matches.iter().map(|(_, offsets)| offsets.len()).sum();
        if visible == 0 && !self.input.is_empty() {
            warn!(
                target: "strata::txn",
                transaction_id = self.context.transaction_id(),
                "No row visible to transaction"
            );
        }
        debug!(
            target: "strata::txn",
            transaction_id = self.context.transaction_id(),
            snapshot_commit_id = self.context.snapshot_commit_id(),
            input_rows = self.input.row_count(),
            visible,
            "Validate finished"
        );
        build_reference_table(&self.input, matches)
    }

    fn validate_chunk(&self, chunk: &Chunk) -> Result<Vec<ChunkOffset>, ScanError> {
        let data = chunk.snapshot();
        match self.input.table_type() {
            TableType::Data => {
                let mvcc = chunk.mvcc_data().ok_or(ScanError::MissingMvccData)?;
                let versions = mvcc.read();
                Ok((0..data.size())
                    .filter(|&offset| {
                        versions
                            .get(offset)
                            .is_some_and(|version| version.is_visible_to(&self.context))
                    })
                    .map(|offset| offset as ChunkOffset)
                    .collect())
            }
            TableType::References => {
                let Some(first) = data.segments().first() else {
                    return Ok(Vec::new());
                };
                let reference = first.as_reference().ok_or_else(|| {
                    TableError::InvalidChunk("data segment in a reference table".to_string())
                })?;
                let mask = visibility(
                    reference.referenced_table(),
                    reference.positions().as_slice(),
                    &self.context,
                )?;
                Ok(mask
                    .into_iter()
                    .enumerate()
                    .filter_map(|(offset, visible)| visible.then_some(offset as ChunkOffset))
                    .collect())
            }
        }
    }
}

/// Visibility of every row, reading each chunk's MVCC rows under one guard.
fn visibility(
    table: &Table,
    rows: &[RowId],
    context: &TransactionContext,
) -> Result<Vec<bool>, ScanError> {
    let chunks = table.chunks();
    let mut guards: HashMap<ChunkId, RwLockReadGuard<'_, Vec<RowVersion>>> = HashMap::new();
    let mut mask = Vec::with_capacity(rows.len());
    for row in rows {
        let versions = match guards.entry(row.chunk_id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let chunk = chunks
                    .get(row.chunk_id as usize)
                    .ok_or(ScanError::ChunkOutOfRange(row.chunk_id))?;
                let mvcc = chunk.mvcc_data().ok_or(ScanError::MissingMvccData)?;
                entry.insert(mvcc.read())
            }
        };
        mask.push(
            versions
                .get(row.chunk_offset as usize)
                .is_some_and(|version| version.is_visible_to(context)),
        );
    }
    Ok(mask)
}
