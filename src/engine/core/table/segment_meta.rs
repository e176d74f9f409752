use serde::Serialize;

use super::Table;
use crate::engine::core::vector::VectorCompressionType;
use crate::engine::types::{ChunkId, ColumnId, DataType};

/// Storage facts about one segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentMetaData {
    pub chunk_id: ChunkId,
    pub column_id: ColumnId,
    pub column_name: String,
    pub data_type: DataType,
    pub encoding: String,
    pub vector_compression: Option<VectorCompressionType>,
    pub row_count: usize,
    pub estimated_size_in_bytes: usize,
}

/// One entry per (chunk, column), in chunk then column order.
pub fn segment_meta_data(table: &Table) -> Vec<SegmentMetaData> {
    let mut entries = Vec::new();
    for (chunk_id, chunk) in table.chunks().iter().enumerate() {
        let data = chunk.snapshot();
        for (column_id, segment) in data.segments().iter().enumerate() {
            let column_name = table
                .column_definition(column_id as ColumnId)
                .map(|d| d.name.clone())
                .unwrap_or_default();
            entries.push(SegmentMetaData {
                chunk_id: chunk_id as ChunkId,
                column_id: column_id as ColumnId,
                column_name,
                data_type: segment.data_type(),
                encoding: segment
                    .encoding_type()
                    .map_or_else(|| "Reference".to_string(), |e| e.to_string()),
                vector_compression: segment.vector_compression(),
                row_count: segment.len(),
                estimated_size_in_bytes: segment.estimate_memory_usage(),
            });
        }
    }
    entries
}
