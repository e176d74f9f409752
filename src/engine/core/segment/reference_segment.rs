use std::collections::BTreeMap;
use std::sync::Arc;

use super::ChunkOffsetMapping;
use crate::engine::core::chunk::PositionList;
use crate::engine::core::table::{Table, TableType};
use crate::engine::errors::{EncodingError, TableError};
use crate::engine::types::{ChunkId, ChunkOffset, ColumnId, ColumnType, DataType, RowId};

/// A column of an intermediate result: every row is a position in a column
/// of a data table.
///
/// Reference segments always point at data tables, never at other
/// reference tables.
#[derive(Debug, Clone)]
pub struct ReferenceSegment {
    referenced_table: Arc<Table>,
    referenced_column_id: ColumnId,
    positions: Arc<PositionList>,
    data_type: DataType,
}

impl ReferenceSegment {
    pub fn new(
        referenced_table: Arc<Table>,
        referenced_column_id: ColumnId,
        positions: Arc<PositionList>,
    ) -> Result<Self, TableError> {
        if referenced_table.table_type() == TableType::References {
            return Err(TableError::NestedReference);
        }
        let data_type = referenced_table
            .column_definition(referenced_column_id)
            .ok_or(TableError::ColumnOutOfRange(referenced_column_id))?
            .data_type;
        Ok(Self {
            referenced_table,
            referenced_column_id,
            positions,
            data_type,
        })
    }

    pub fn referenced_table(&self) -> &Arc<Table> {
        &self.referenced_table
    }

    pub fn referenced_column_id(&self) -> ColumnId {
        self.referenced_column_id
    }

    pub fn positions(&self) -> &Arc<PositionList> {
        &self.positions
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn estimate_memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.positions.estimate_memory_usage()
    }

    /// Resolves every position, in position-list order.
    pub fn materialize<T: ColumnType>(
        &self,
    ) -> Result<Vec<(ChunkOffset, Option<T>)>, EncodingError> {
        self.resolve(
            self.positions
                .iter()
                .enumerate()
                .map(|(i, row)| (i as ChunkOffset, *row)),
        )
    }

    /// Reads the referenced values for `(reported offset, row)` pairs.
    ///
    /// Rows are grouped per referenced chunk so each chunk is read with one
    /// cursor against one consistent segment snapshot. The output keeps the
    /// request order.
    pub fn resolve<T: ColumnType>(
        &self,
        requests: impl IntoIterator<Item = (ChunkOffset, RowId)>,
    ) -> Result<Vec<(ChunkOffset, Option<T>)>, EncodingError> {
        let mut resolved: Vec<(ChunkOffset, Option<T>)> = Vec::new();
        let mut per_chunk: BTreeMap<ChunkId, Vec<ChunkOffsetMapping>> = BTreeMap::new();

        for (slot, (reported, row)) in requests.into_iter().enumerate() {
            resolved.push((reported, None));
            per_chunk
                .entry(row.chunk_id)
                .or_default()
                .push(ChunkOffsetMapping {
                    offset_in_poslist: slot as ChunkOffset,
                    offset_in_referenced_chunk: row.chunk_offset,
                });
        }

        for (chunk_id, mappings) in per_chunk {
            let chunk = self.referenced_table.get_chunk(chunk_id).ok_or_else(|| {
                EncodingError::DanglingReference(RowId::new(
                    chunk_id,
                    mappings[0].offset_in_referenced_chunk,
                ))
            })?;
            let data = chunk.snapshot();
            let segment = data.segment(self.referenced_column_id).ok_or_else(|| {
                EncodingError::Corrupted(format!(
                    "chunk {chunk_id} has no column {}",
                    self.referenced_column_id
                ))
            })?;
            let typed = segment.typed::<T>()?;

            if let Some(bad) = mappings
                .iter()
                .find(|m| m.offset_in_referenced_chunk as usize >= typed.len())
            {
                return Err(EncodingError::DanglingReference(RowId::new(
                    chunk_id,
                    bad.offset_in_referenced_chunk,
                )));
            }

            for position in typed.point_iter(mappings)? {
                let slot = position.chunk_offset() as usize;
                resolved[slot].1 = position.into_option();
            }
        }

        Ok(resolved)
    }
}
