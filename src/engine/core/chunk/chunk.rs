use std::cmp::Ordering;
use std::sync::Arc;
use std::sync::atomic::{self, AtomicBool, AtomicUsize};

use parking_lot::RwLock;
use tracing::debug;

use super::{ChunkData, MvccData, RowVersion};
use crate::engine::core::index::{ChunkIndex, GroupKeyIndex};
use crate::engine::core::segment::{EncodingType, Segment};
use crate::engine::core::table::ColumnDefinition;
use crate::engine::errors::{EncodingError, IndexError, TableError};
use crate::engine::types::{ColumnId, ColumnType, OrderByMode, Value, resolve_data_type};

/// A row group: one segment per column, optional sort metadata, optional
/// MVCC rows.
///
/// Readers take a [`snapshot`](Self::snapshot) and keep using it; writers
/// build a complete new [`ChunkData`] and swap it in, so a scan sees either
/// the old or the new segment set.
#[derive(Debug)]
pub struct Chunk {
    data: RwLock<Arc<ChunkData>>,
    finalized: AtomicBool,
    invalid_row_count: AtomicUsize,
    mvcc_data: Option<MvccData>,
}

impl Chunk {
    /// Chunk over existing segments. All segments and the MVCC rows must
    /// agree on the row count.
    pub fn new(segments: Vec<Segment>, mvcc_data: Option<MvccData>) -> Result<Self, TableError> {
        let segments: Vec<Arc<Segment>> = segments.into_iter().map(Arc::new).collect();
        let size = segments.first().map_or(0, |s| s.len());
        if let Some((column, segment)) = segments.iter().enumerate().find(|(_, s)| s.len() != size)
        {
            return Err(TableError::InvalidChunk(format!(
                "segment {column} has {} rows, expected {size}",
                segment.len()
            )));
        }
        if let Some(mvcc) = &mvcc_data {
            if mvcc.len() != size {
                return Err(TableError::InvalidChunk(format!(
                    "{} MVCC rows for {size} rows",
                    mvcc.len()
                )));
            }
        }
        Ok(Self {
            data: RwLock::new(Arc::new(ChunkData {
                segments,
                ordered_by: None,
                indexes: Vec::new(),
            })),
            finalized: AtomicBool::new(false),
            invalid_row_count: AtomicUsize::new(0),
            mvcc_data,
        })
    }

    /// Empty appendable chunk for `definitions`.
    pub fn new_mutable(definitions: &[ColumnDefinition], use_mvcc: bool) -> Self {
        let segments = definitions
            .iter()
            .map(|d| Arc::new(Segment::new_value_segment(d.data_type, d.nullable)))
            .collect();
        Self {
            data: RwLock::new(Arc::new(ChunkData {
                segments,
                ordered_by: None,
                indexes: Vec::new(),
            })),
            finalized: AtomicBool::new(false),
            invalid_row_count: AtomicUsize::new(0),
            mvcc_data: use_mvcc.then(MvccData::new),
        }
    }

    /// Current segment set. Holding it does not block writers.
    pub fn snapshot(&self) -> Arc<ChunkData> {
        Arc::clone(&self.data.read())
    }

    pub fn size(&self) -> usize {
        self.data.read().size()
    }

    pub fn column_count(&self) -> usize {
        self.data.read().column_count()
    }

    pub fn segment(&self, column_id: ColumnId) -> Option<Arc<Segment>> {
        self.data.read().segments.get(column_id as usize).cloned()
    }

    pub fn mvcc_data(&self) -> Option<&MvccData> {
        self.mvcc_data.as_ref()
    }

    pub fn has_mvcc_data(&self) -> bool {
        self.mvcc_data.is_some()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized.load(atomic::Ordering::Acquire)
    }

    /// Rows whose delete has been committed.
    pub fn invalid_row_count(&self) -> usize {
        self.invalid_row_count.load(atomic::Ordering::Acquire)
    }

    pub fn increase_invalid_row_count(&self, count: usize) {
        self.invalid_row_count.fetch_add(count, atomic::Ordering::AcqRel);
    }

    /// Fixes the row count. Segments may still be re-encoded afterwards.
    pub fn finalize(&self) {
        self.finalized.store(true, atomic::Ordering::Release);
    }

    /// Appends one row. The row is checked against `definitions` first, so a
    /// rejected row leaves the chunk untouched.
    pub fn append(
        &self,
        values: &[Value],
        definitions: &[ColumnDefinition],
        version: Option<RowVersion>,
    ) -> Result<(), TableError> {
        if self.is_finalized() {
            return Err(TableError::ChunkImmutable);
        }
        if values.len() != definitions.len() {
            return Err(TableError::ArityMismatch {
                expected: definitions.len(),
                actual: values.len(),
            });
        }
        for (definition, value) in definitions.iter().zip(values) {
            definition.check(value)?;
        }

        let mut guard = self.data.write();
        // Only value segments take appends; checked before the MVCC row goes in.
        if guard
            .segments
            .iter()
            .any(|s| s.encoding_type() != Some(EncodingType::Unencoded))
        {
            return Err(TableError::ChunkImmutable);
        }
        // MVCC first: a concurrent scan must never find a row without version.
        if let Some(mvcc) = &self.mvcc_data {
            mvcc.push(version.unwrap_or(RowVersion::committed(0)));
        }
        let data = Arc::make_mut(&mut guard);
        for ((segment, value), definition) in data.segments.iter_mut().zip(values).zip(definitions)
        {
            Arc::make_mut(segment).append(value, &definition.name)?;
        }
        Ok(())
    }

    pub fn ordered_by(&self) -> Option<(ColumnId, OrderByMode)> {
        self.data.read().ordered_by
    }

    /// Records that the chunk is sorted on `column_id`. The claim is checked
    /// against the data.
    pub fn set_ordered_by(&self, column_id: ColumnId, mode: OrderByMode) -> Result<(), TableError> {
        let mut guard = self.data.write();
        let segment = guard
            .segments
            .get(column_id as usize)
            .ok_or(TableError::MalformedSortMetadata {
                column_id,
                reason: format!("chunk has {} columns", guard.segments.len()),
            })?;
        let unsorted = resolve_data_type!(segment.data_type(), T => {
            first_unsorted_offset::<T>(segment, mode)?
        });
        if let Some(offset) = unsorted {
            return Err(TableError::MalformedSortMetadata {
                column_id,
                reason: format!("row {offset} breaks {mode} order"),
            });
        }
        Arc::make_mut(&mut guard).ordered_by = Some((column_id, mode));
        Ok(())
    }

    /// Swaps in a new segment set atomically. Indexes built on the old
    /// segments are dropped; the sort metadata is kept only when the caller
    /// says the new segments preserve the row order. The chunk must be
    /// finalized.
    pub fn replace_segments(
        &self,
        segments: Vec<Arc<Segment>>,
        keeps_order: bool,
    ) -> Result<(), TableError> {
        if !self.is_finalized() {
            return Err(EncodingError::ChunkNotFinalized.into());
        }
        let mut guard = self.data.write();
        if segments.len() != guard.segments.len() {
            return Err(TableError::ArityMismatch {
                expected: guard.segments.len(),
                actual: segments.len(),
            });
        }
        let size = guard.size();
        if let Some((column, segment)) = segments.iter().enumerate().find(|(_, s)| s.len() != size)
        {
            return Err(TableError::InvalidChunk(format!(
                "replacement segment {column} has {} rows, expected {size}",
                segment.len()
            )));
        }
        let ordered_by = if keeps_order { guard.ordered_by } else { None };
        *guard = Arc::new(ChunkData {
            segments,
            ordered_by,
            indexes: Vec::new(),
        });
        Ok(())
    }

    /// Builds a group-key index over one dictionary-encoded column and
    /// registers it with the current segment set.
    pub fn create_group_key_index(
        &self,
        column_id: ColumnId,
    ) -> Result<Arc<GroupKeyIndex>, IndexError> {
        let mut guard = self.data.write();
        let segment = guard
            .segments
            .get(column_id as usize)
            .ok_or(IndexError::ColumnOutOfRange(column_id))?;
        let index = Arc::new(GroupKeyIndex::build(column_id, segment)?);
        let data = Arc::make_mut(&mut guard);
        data.indexes.retain(|i| i.columns() != [column_id]);
        data.indexes.push(Arc::clone(&index) as Arc<dyn ChunkIndex>);
        debug!(
            target: "strata::index",
            column_id,
            bytes = index.memory_consumption(),
            "Created group-key index"
        );
        Ok(index)
    }

    pub fn get_index(&self, columns: &[ColumnId]) -> Option<Arc<dyn ChunkIndex>> {
        self.data.read().index_for(columns).cloned()
    }

    pub fn estimate_memory_usage(&self) -> usize {
        let data = self.snapshot();
        std::mem::size_of::<Self>()
            + data
                .segments
                .iter()
                .map(|s| s.estimate_memory_usage())
                .sum::<usize>()
            + data
                .indexes
                .iter()
                .map(|i| i.memory_consumption())
                .sum::<usize>()
            + self
                .mvcc_data
                .as_ref()
                .map_or(0, MvccData::estimate_memory_usage)
    }
}

/// First offset that is out of order, if any.
fn first_unsorted_offset<T: ColumnType>(
    segment: &Segment,
    mode: OrderByMode,
) -> Result<Option<usize>, TableError> {
    let mut previous: Option<Option<T>> = None;
    for (offset, position) in segment.iter::<T>()?.enumerate() {
        let current = position.into_option();
        if let Some(previous) = &previous {
            if mode.compare(previous.as_ref(), current.as_ref(), T::total_cmp) == Ordering::Greater {
                return Ok(Some(offset));
            }
        }
        previous = Some(current);
    }
    Ok(None)
}
