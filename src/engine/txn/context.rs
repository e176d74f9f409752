use crate::engine::types::{CommitId, TransactionId};

/// Identity and snapshot of one transaction, fixed when it begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionContext {
    transaction_id: TransactionId,
    snapshot_commit_id: CommitId,
}

impl TransactionContext {
    pub fn new(transaction_id: TransactionId, snapshot_commit_id: CommitId) -> Self {
        Self {
            transaction_id,
            snapshot_commit_id,
        }
    }

    #[inline]
    pub fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    #[inline]
    pub fn snapshot_commit_id(&self) -> CommitId {
        self.snapshot_commit_id
    }
}
