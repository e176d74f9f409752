use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;

use super::CancellationToken;
use crate::engine::core::chunk::{Chunk, PositionList};
use crate::engine::core::segment::{ReferenceSegment, Segment};
use crate::engine::core::table::{Table, TableType, UseMvcc};
use crate::engine::errors::{ScanError, TableError};
use crate::engine::types::{ChunkId, ChunkOffset, ColumnId, RowId};

/// Runs `work` on every chunk, in parallel once there are at least
/// `parallel_threshold` chunks. Results keep chunk order; cancellation is
/// checked before each chunk starts.
pub(crate) fn run_per_chunk<R, F>(
    chunks: &[Arc<Chunk>],
    parallel_threshold: usize,
    cancellation: &CancellationToken,
    work: F,
) -> Result<Vec<R>, ScanError>
where
    R: Send,
    F: Fn(ChunkId, &Chunk) -> Result<R, ScanError> + Sync + Send,
{
    let run = |(chunk_id, chunk): (usize, &Arc<Chunk>)| {
        cancellation.check()?;
        work(chunk_id as ChunkId, chunk)
    };
    if chunks.len() >= parallel_threshold.max(1) {
        chunks.par_iter().enumerate().map(run).collect()
    } else {
        chunks.iter().enumerate().map(run).collect()
    }
}

/// Wraps per-chunk matches of `input` into a reference table.
///
/// Data inputs get one position list per output chunk, shared by all
/// columns. Reference inputs are resolved through to the data table they
/// point at, so the output never references another reference table.
/// Chunks without matches are left out.
pub(crate) fn build_reference_table(
    input: &Arc<Table>,
    matches: Vec<(ChunkId, Vec<ChunkOffset>)>,
) -> Result<Arc<Table>, ScanError> {
    let output = Table::new(
        input.column_definitions().to_vec(),
        TableType::References,
        Some(input.target_chunk_size()),
        UseMvcc::No,
    );

    for (chunk_id, offsets) in matches {
        if offsets.is_empty() {
            continue;
        }
        let chunk = input
            .get_chunk(chunk_id)
            .ok_or(ScanError::ChunkOutOfRange(chunk_id))?;

        let segments = match input.table_type() {
            TableType::Data => {
                let positions: Arc<PositionList> = Arc::new(
                    offsets
                        .iter()
                        .map(|&offset| RowId::new(chunk_id, offset))
                        .collect(),
                );
                (0..input.column_count())
                    .map(|column_id| {
                        ReferenceSegment::new(
                            Arc::clone(input),
                            column_id as ColumnId,
                            Arc::clone(&positions),
                        )
                        .map(Segment::Reference)
                    })
                    .collect::<Result<Vec<_>, TableError>>()?
            }
            TableType::References => {
                let data = chunk.snapshot();
                let mut filtered: HashMap<*const PositionList, Arc<PositionList>> = HashMap::new();
                let mut segments = Vec::with_capacity(data.column_count());
                for segment in data.segments() {
                    let reference = segment.as_reference().ok_or(TableError::InvalidChunk(
                        "data segment in a reference table".to_string(),
                    ))?;
                    let key = Arc::as_ptr(reference.positions());
                    let positions = match filtered.get(&key) {
                        Some(positions) => Arc::clone(positions),
                        None => {
                            let source = reference.positions();
                            let positions = offsets
                                .iter()
                                .map(|&offset| {
                                    source.get(offset as usize).ok_or_else(|| {
                                        TableError::RowOutOfRange(offset as u64)
                                    })
                                })
                                .collect::<Result<PositionList, _>>()?;
                            let positions = Arc::new(positions);
                            filtered.insert(key, Arc::clone(&positions));
                            positions
                        }
                    };
                    segments.push(Segment::Reference(ReferenceSegment::new(
                        Arc::clone(reference.referenced_table()),
                        reference.referenced_column_id(),
                        positions,
                    )?));
                }
                segments
            }
        };

        output.append_chunk(segments, None)?;
    }

    Ok(Arc::new(output))
}
