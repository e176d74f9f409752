use std::sync::Arc;

use crate::engine::core::index::ChunkIndex;
use crate::engine::core::segment::Segment;
use crate::engine::types::{ColumnId, OrderByMode};

/// Everything a scan reads from a chunk, swapped as one unit.
#[derive(Debug, Clone, Default)]
pub struct ChunkData {
    pub(super) segments: Vec<Arc<Segment>>,
    pub(super) ordered_by: Option<(ColumnId, OrderByMode)>,
    pub(super) indexes: Vec<Arc<dyn ChunkIndex>>,
}

impl ChunkData {
    pub fn segments(&self) -> &[Arc<Segment>] {
        &self.segments
    }

    pub fn segment(&self, column_id: ColumnId) -> Option<&Segment> {
        self.segments.get(column_id as usize).map(|s| s.as_ref())
    }

    pub fn column_count(&self) -> usize {
        self.segments.len()
    }

    /// Row count, taken from the first segment.
    pub fn size(&self) -> usize {
        self.segments.first().map_or(0, |s| s.len())
    }

    pub fn ordered_by(&self) -> Option<(ColumnId, OrderByMode)> {
        self.ordered_by
    }

    pub fn indexes(&self) -> &[Arc<dyn ChunkIndex>] {
        &self.indexes
    }

    /// Index covering exactly `columns`.
    pub fn index_for(&self, columns: &[ColumnId]) -> Option<&Arc<dyn ChunkIndex>> {
        self.indexes.iter().find(|index| index.columns() == columns)
    }
}
