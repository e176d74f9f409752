use std::fmt;

use serde::Serialize;

use crate::engine::core::segment::EncodingType;
use crate::engine::errors::IndexError;
use crate::engine::scan::PredicateCondition;
use crate::engine::types::{ChunkOffset, ColumnId, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IndexKind {
    GroupKey,
}

impl IndexKind {
    /// Segment encoding the index kind is built on.
    pub fn supported_encoding(&self) -> EncodingType {
        match self {
            IndexKind::GroupKey => EncodingType::Dictionary,
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::GroupKey => f.write_str("GroupKey"),
        }
    }
}

/// An index over some columns of one chunk.
pub trait ChunkIndex: fmt::Debug + Send + Sync {
    fn kind(&self) -> IndexKind;

    fn columns(&self) -> &[ColumnId];

    fn supported_encoding(&self) -> EncodingType {
        self.kind().supported_encoding()
    }

    /// Offsets of all rows satisfying `condition` against `values`, ascending.
    fn lookup(
        &self,
        condition: PredicateCondition,
        values: &[Value],
    ) -> Result<Vec<ChunkOffset>, IndexError>;

    fn memory_consumption(&self) -> usize;
}
