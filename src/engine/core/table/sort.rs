use std::sync::Arc;

use tracing::info;

use super::{Table, TableType, UseMvcc};
use crate::engine::core::segment::{ChunkEncoder, Segment, SegmentEncodingSpec};
use crate::engine::errors::TableError;
use crate::engine::types::{ColumnId, ColumnType, OrderByMode, Value, resolve_data_type};

/// Copies `table` into a new table of `chunk_size` rows per chunk, with every
/// chunk sorted on `column_id` on its own.
///
/// Rows keep their chunk membership by input order; only the order inside
/// each chunk changes. Every output chunk carries the sort metadata, is
/// finalized and, when `encoding` is given, encoded with it on all columns.
/// The copy has no MVCC data.
pub fn sort_table_chunk_wise(
    table: &Table,
    column_id: ColumnId,
    chunk_size: usize,
    encoding: Option<SegmentEncodingSpec>,
    mode: OrderByMode,
) -> Result<Arc<Table>, TableError> {
    let sort_type = table
        .column_data_type(column_id)
        .ok_or(TableError::ColumnOutOfRange(column_id))?;
    let chunk_size = chunk_size.max(1);
    let definitions = table.column_definitions().to_vec();
    let sorted = Arc::new(Table::new(
        definitions.clone(),
        TableType::Data,
        Some(chunk_size),
        UseMvcc::No,
    ));

    let rows = table.get_rows()?;
    for rows in rows.chunks(chunk_size) {
        let permutation = resolve_data_type!(sort_type, T => {
            sort_permutation::<T>(rows, column_id as usize, mode)
        });

        let mut segments: Vec<Segment> = definitions
            .iter()
            .map(|d| Segment::new_value_segment(d.data_type, d.nullable))
            .collect();
        for row_index in permutation {
            let row = &rows[row_index];
            for ((segment, value), definition) in segments.iter_mut().zip(row).zip(&definitions) {
                segment.append(value, &definition.name)?;
            }
        }

        let chunk_id = sorted.append_chunk(segments, None)?;
        let chunk = sorted
            .get_chunk(chunk_id)
            .ok_or(TableError::ChunkOutOfRange(chunk_id))?;
        chunk.set_ordered_by(column_id, mode)?;
        if let Some(spec) = encoding {
            ChunkEncoder::encode_chunk(&chunk, &vec![spec; definitions.len()])?;
        }
    }

    info!(
        target: "strata::table",
        column_id,
        mode = %mode,
        chunks = sorted.chunk_count(),
        rows = sorted.row_count(),
        "Sorted table chunk-wise"
    );
    Ok(sorted)
}

/// Stable order of `rows` on one column under `mode`.
fn sort_permutation<T: ColumnType>(rows: &[Vec<Value>], column: usize, mode: OrderByMode) -> Vec<usize> {
    let keys: Vec<Option<T>> = rows
        .iter()
        .map(|row| row.get(column).and_then(T::from_value))
        .collect();
    let mut permutation: Vec<usize> = (0..rows.len()).collect();
    permutation.sort_by(|&a, &b| mode.compare(keys[a].as_ref(), keys[b].as_ref(), T::total_cmp));
    permutation
}
