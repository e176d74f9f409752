use parking_lot::{RwLock, RwLockReadGuard};

use crate::engine::errors::TransactionError;
use crate::engine::types::{
    ChunkOffset, CommitId, INVALID_TRANSACTION_ID, MAX_COMMIT_ID, RowId, TransactionId,
};

/// Version state of one row. Visibility is always derived from these three
/// fields; there is no separate state flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowVersion {
    pub last_writer_tid: TransactionId,
    pub begin_cid: CommitId,
    pub end_cid: CommitId,
}

impl RowVersion {
    pub fn new(last_writer_tid: TransactionId, begin_cid: CommitId, end_cid: CommitId) -> Self {
        Self {
            last_writer_tid,
            begin_cid,
            end_cid,
        }
    }

    /// Committed, live row.
    pub fn committed(begin_cid: CommitId) -> Self {
        Self::new(INVALID_TRANSACTION_ID, begin_cid, MAX_COMMIT_ID)
    }

    /// Row inserted by `tid` and not committed yet.
    pub fn uncommitted_insert(tid: TransactionId) -> Self {
        Self::new(tid, MAX_COMMIT_ID, MAX_COMMIT_ID)
    }
}

/// Per-row MVCC state of one chunk.
///
/// Readers take one read guard per chunk, so all three fields of every row
/// are observed together.
#[derive(Debug, Default)]
pub struct MvccData {
    rows: RwLock<Vec<RowVersion>>,
}

impl MvccData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<RowVersion>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    pub fn push(&self, version: RowVersion) {
        self.rows.write().push(version);
    }

    pub fn get(&self, offset: ChunkOffset) -> Option<RowVersion> {
        self.rows.read().get(offset as usize).copied()
    }

    /// Consistent view of every row for the lifetime of the guard.
    pub fn read(&self) -> RwLockReadGuard<'_, Vec<RowVersion>> {
        self.rows.read()
    }

    /// Takes write ownership of a row for `tid`. Succeeds when nobody owns
    /// the row or `tid` already does.
    pub fn try_lock_row(
        &self,
        row: RowId,
        tid: TransactionId,
    ) -> Result<(), TransactionError> {
        let mut rows = self.rows.write();
        let version = rows
            .get_mut(row.chunk_offset as usize)
            .ok_or(TransactionError::RowOutOfRange(row))?;
        match version.last_writer_tid {
            INVALID_TRANSACTION_ID => {
                version.last_writer_tid = tid;
                Ok(())
            }
            owner if owner == tid => Ok(()),
            owner => Err(TransactionError::WriteConflict { row, owner }),
        }
    }

    /// Applies `update` to one row under the write lock.
    pub fn update(
        &self,
        row: RowId,
        update: impl FnOnce(&mut RowVersion),
    ) -> Result<(), TransactionError> {
        let mut rows = self.rows.write();
        let version = rows
            .get_mut(row.chunk_offset as usize)
            .ok_or(TransactionError::RowOutOfRange(row))?;
        update(version);
        Ok(())
    }

    pub fn estimate_memory_usage(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.rows.read().capacity() * std::mem::size_of::<RowVersion>()
    }
}
