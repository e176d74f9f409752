use crate::engine::types::{ChunkId, RowId};

/// Ordered row references produced by a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionList {
    rows: Vec<RowId>,
}

impl PositionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, row: RowId) {
        self.rows.push(row);
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<RowId> {
        self.rows.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RowId> {
        self.rows.iter()
    }

    pub fn as_slice(&self) -> &[RowId] {
        &self.rows
    }

    pub fn into_inner(self) -> Vec<RowId> {
        self.rows
    }

    /// Chunk shared by every row, if there is exactly one.
    pub fn single_chunk(&self) -> Option<ChunkId> {
        let first = self.rows.first()?.chunk_id;
        self.rows
            .iter()
            .all(|row| row.chunk_id == first)
            .then_some(first)
    }

    pub fn estimate_memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.rows.capacity() * std::mem::size_of::<RowId>()
    }
}

impl From<Vec<RowId>> for PositionList {
    fn from(rows: Vec<RowId>) -> Self {
        Self { rows }
    }
}

impl FromIterator<RowId> for PositionList {
    fn from_iter<I: IntoIterator<Item = RowId>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl Extend<RowId> for PositionList {
    fn extend<I: IntoIterator<Item = RowId>>(&mut self, iter: I) {
        self.rows.extend(iter);
    }
}

impl<'a> IntoIterator for &'a PositionList {
    type Item = &'a RowId;
    type IntoIter = std::slice::Iter<'a, RowId>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
