use std::fmt;

use serde::Serialize;

pub type ChunkId = u32;
pub type ChunkOffset = u32;
pub type ColumnId = u16;
pub type TransactionId = u64;
pub type CommitId = u64;

/// Marks a row that no transaction currently owns.
pub const INVALID_TRANSACTION_ID: TransactionId = 0;
/// Begin/end horizon of a row that has not been committed (or deleted) yet.
pub const MAX_COMMIT_ID: CommitId = u64::MAX;

/// Reference to one row of a table: the chunk and the offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RowId {
    pub chunk_id: ChunkId,
    pub chunk_offset: ChunkOffset,
}

impl RowId {
    #[inline]
    pub fn new(chunk_id: ChunkId, chunk_offset: ChunkOffset) -> Self {
        Self {
            chunk_id,
            chunk_offset,
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chunk_id, self.chunk_offset)
    }
}
