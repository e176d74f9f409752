use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, info};

use super::TransactionContext;
use crate::engine::core::chunk::MvccData;
use crate::engine::core::table::Table;
use crate::engine::errors::{TableError, TransactionError};
use crate::engine::types::{CommitId, INVALID_TRANSACTION_ID, MAX_COMMIT_ID, RowId, Value};

/// A row write that becomes visible to others only at commit.
#[derive(Debug, Clone)]
pub enum PendingWrite {
    Insert { table: Arc<Table>, row: RowId },
    Delete { table: Arc<Table>, row: RowId },
}

impl PendingWrite {
    fn target(&self) -> (&Arc<Table>, RowId) {
        match self {
            PendingWrite::Insert { table, row } | PendingWrite::Delete { table, row } => {
                (table, *row)
            }
        }
    }
}

/// Hands out transaction ids and sequences commits.
///
/// Commit ids form a total order: one commit at a time holds the sequencer
/// lock, applies its writes and only then publishes its id as the newest
/// snapshot.
#[derive(Debug)]
pub struct TransactionManager {
    next_transaction_id: AtomicU64,
    last_commit_id: Mutex<CommitId>,
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionManager {
    pub fn new() -> Self {
        Self {
            next_transaction_id: AtomicU64::new(INVALID_TRANSACTION_ID + 1),
            last_commit_id: Mutex::new(0),
        }
    }

    pub fn last_commit_id(&self) -> CommitId {
        *self.last_commit_id.lock()
    }

    /// New transaction seeing everything committed so far.
    pub fn begin(&self) -> TransactionContext {
        let transaction_id = self.next_transaction_id.fetch_add(1, Ordering::Relaxed);
        let snapshot_commit_id = self.last_commit_id();
        debug!(
            target: "strata::txn",
            transaction_id,
            snapshot_commit_id,
            "Transaction started"
        );
        TransactionContext::new(transaction_id, snapshot_commit_id)
    }

    /// Inserts a row owned by `ctx` until commit.
    pub fn insert(
        &self,
        ctx: &TransactionContext,
        table: &Arc<Table>,
        values: &[Value],
    ) -> Result<PendingWrite, TableError> {
        let row = table.append_uncommitted(values, ctx.transaction_id())?;
        Ok(PendingWrite::Insert {
            table: Arc::clone(table),
            row,
        })
    }

    /// Claims a row for deletion. Fails if another live writer owns it.
    pub fn delete(
        &self,
        ctx: &TransactionContext,
        table: &Arc<Table>,
        row: RowId,
    ) -> Result<PendingWrite, TransactionError> {
        with_mvcc(table, row, |mvcc| mvcc.try_lock_row(row, ctx.transaction_id()))?;
        Ok(PendingWrite::Delete {
            table: Arc::clone(table),
            row,
        })
    }

    /// Assigns the next commit id and stamps it on every write.
    pub fn commit(
        &self,
        ctx: &TransactionContext,
        writes: &[PendingWrite],
    ) -> Result<CommitId, TransactionError> {
        // Every target must exist and be owned by `ctx` before the first row
        // is stamped.
        for write in writes {
            let (table, row) = write.target();
            let version = with_mvcc(table, row, |mvcc| {
                mvcc.get(row.chunk_offset)
                    .ok_or(TransactionError::RowOutOfRange(row))
            })?;
            if version.last_writer_tid != ctx.transaction_id() {
                return Err(TransactionError::RowNotClaimed {
                    row,
                    transaction_id: ctx.transaction_id(),
                });
            }
        }

        let mut last_commit_id = self.last_commit_id.lock();
        let commit_id = *last_commit_id + 1;
        for write in writes {
            let (table, row) = write.target();
            let newly_deleted = with_mvcc(table, row, |mvcc| match write {
                PendingWrite::Insert { .. } => mvcc
                    .update(row, |version| {
                        version.begin_cid = commit_id;
                        version.last_writer_tid = INVALID_TRANSACTION_ID;
                    })
                    .map(|_| false),
                // The deleter keeps ownership, so later deletes conflict.
                PendingWrite::Delete { .. } => {
                    let mut newly_deleted = false;
                    mvcc.update(row, |version| {
                        if version.end_cid == MAX_COMMIT_ID {
                            version.end_cid = commit_id;
                            newly_deleted = true;
                        }
                    })?;
                    Ok(newly_deleted)
                }
            })?;
            if newly_deleted {
                if let Some(chunk) = table.get_chunk(row.chunk_id) {
                    chunk.increase_invalid_row_count(1);
                }
            }
        }
        *last_commit_id = commit_id;
        info!(
            target: "strata::txn",
            transaction_id = ctx.transaction_id(),
            commit_id,
            writes = writes.len(),
            "Transaction committed"
        );
        Ok(commit_id)
    }

    /// Releases every row the transaction owns. Rolled-back inserts never
    /// become visible since their begin id stays open.
    pub fn rollback(
        &self,
        ctx: &TransactionContext,
        writes: &[PendingWrite],
    ) -> Result<(), TransactionError> {
        for write in writes {
            let (table, row) = write.target();
            with_mvcc(table, row, |mvcc| {
                mvcc.update(row, |version| {
                    if version.last_writer_tid == ctx.transaction_id() {
                        version.last_writer_tid = INVALID_TRANSACTION_ID;
                    }
                })
            })?;
        }
        debug!(
            target: "strata::txn",
            transaction_id = ctx.transaction_id(),
            writes = writes.len(),
            "Transaction rolled back"
        );
        Ok(())
    }
}

/// Runs `f` on the MVCC rows of the chunk holding `row`.
fn with_mvcc<R>(
    table: &Table,
    row: RowId,
    f: impl FnOnce(&MvccData) -> Result<R, TransactionError>,
) -> Result<R, TransactionError> {
    let chunk = table
        .get_chunk(row.chunk_id)
        .ok_or(TransactionError::RowOutOfRange(row))?;
    let mvcc = chunk
        .mvcc_data()
        .ok_or(TransactionError::MissingMvccData(row))?;
    f(mvcc)
}
