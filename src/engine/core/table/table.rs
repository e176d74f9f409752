use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::debug;

use super::ColumnDefinition;
use crate::engine::core::chunk::{Chunk, MvccData, RowVersion};
use crate::engine::core::segment::Segment;
use crate::engine::errors::TableError;
use crate::engine::types::{
    ChunkId, ChunkOffset, ColumnId, DataType, RowId, TransactionId, Value,
};
use crate::shared::config::CONFIG;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TableType {
    /// Chunks hold value, dictionary or otherwise encoded segments.
    Data,
    /// Chunks hold reference segments into data tables.
    References,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseMvcc {
    Yes,
    No,
}

/// An ordered sequence of chunks sharing one schema.
#[derive(Debug)]
pub struct Table {
    column_definitions: Vec<ColumnDefinition>,
    table_type: TableType,
    use_mvcc: UseMvcc,
    target_chunk_size: usize,
    chunks: RwLock<Vec<Arc<Chunk>>>,
    append_lock: Mutex<()>,
}

impl Table {
    /// `chunk_size` of `None` uses the configured storage chunk size.
    pub fn new(
        column_definitions: Vec<ColumnDefinition>,
        table_type: TableType,
        chunk_size: Option<usize>,
        use_mvcc: UseMvcc,
    ) -> Self {
        let target_chunk_size = chunk_size.unwrap_or(CONFIG.storage.chunk_size).max(1);
        let use_mvcc = match table_type {
            TableType::Data => use_mvcc,
            TableType::References => UseMvcc::No,
        };
        Self {
            column_definitions,
            table_type,
            use_mvcc,
            target_chunk_size,
            chunks: RwLock::new(Vec::new()),
            append_lock: Mutex::new(()),
        }
    }

    pub fn column_definitions(&self) -> &[ColumnDefinition] {
        &self.column_definitions
    }

    pub fn column_definition(&self, column_id: ColumnId) -> Option<&ColumnDefinition> {
        self.column_definitions.get(column_id as usize)
    }

    pub fn column_count(&self) -> usize {
        self.column_definitions.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.column_definitions
            .iter()
            .map(|d| d.name.as_str())
            .collect()
    }

    pub fn column_data_type(&self, column_id: ColumnId) -> Option<DataType> {
        self.column_definition(column_id).map(|d| d.data_type)
    }

    pub fn column_id_by_name(&self, name: &str) -> Result<ColumnId, TableError> {
        self.column_definitions
            .iter()
            .position(|d| d.name == name)
            .map(|i| i as ColumnId)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }

    pub fn table_type(&self) -> TableType {
        self.table_type
    }

    pub fn uses_mvcc(&self) -> bool {
        self.use_mvcc == UseMvcc::Yes
    }

    pub fn target_chunk_size(&self) -> usize {
        self.target_chunk_size
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.read().len()
    }

    /// Handles to all chunks at the time of the call.
    pub fn chunks(&self) -> Vec<Arc<Chunk>> {
        self.chunks.read().clone()
    }

    pub fn get_chunk(&self, chunk_id: ChunkId) -> Option<Arc<Chunk>> {
        self.chunks.read().get(chunk_id as usize).cloned()
    }

    pub fn row_count(&self) -> u64 {
        self.chunks.read().iter().map(|c| c.size() as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Appends a complete chunk. The chunk is finalized, as is the chunk
    /// that was last before it.
    pub fn append_chunk(
        &self,
        segments: Vec<Segment>,
        mvcc_data: Option<MvccData>,
    ) -> Result<ChunkId, TableError> {
        if segments.len() != self.column_count() {
            return Err(TableError::ArityMismatch {
                expected: self.column_count(),
                actual: segments.len(),
            });
        }
        for (definition, segment) in self.column_definitions.iter().zip(&segments) {
            let expects_reference = self.table_type == TableType::References;
            if segment.is_reference() != expects_reference {
                return Err(TableError::InvalidChunk(format!(
                    "{} segment in column '{}' of a {:?} table",
                    segment.kind(),
                    definition.name,
                    self.table_type
                )));
            }
            if segment.data_type() != definition.data_type {
                return Err(TableError::InvalidChunk(format!(
                    "column '{}' is {}, segment holds {}",
                    definition.name,
                    definition.data_type,
                    segment.data_type()
                )));
            }
        }

        let mvcc_data = match (self.use_mvcc, mvcc_data) {
            (UseMvcc::Yes, Some(mvcc)) => Some(mvcc),
            (UseMvcc::Yes, None) => {
                let size = segments.first().map_or(0, |s| s.len());
                Some(MvccData::with_rows(vec![RowVersion::committed(0); size]))
            }
            (UseMvcc::No, None) => None,
            (UseMvcc::No, Some(_)) => {
                return Err(TableError::InvalidChunk(
                    "MVCC data on a table without MVCC".to_string(),
                ));
            }
        };

        let chunk = Chunk::new(segments, mvcc_data)?;
        chunk.finalize();

        let _guard = self.append_lock.lock();
        let mut chunks = self.chunks.write();
        if let Some(last) = chunks.last() {
            last.finalize();
        }
        chunks.push(Arc::new(chunk));
        Ok((chunks.len() - 1) as ChunkId)
    }

    /// Appends a committed row, as a bulk loader would.
    pub fn append(&self, values: &[Value]) -> Result<RowId, TableError> {
        self.append_with_version(values, self.uses_mvcc().then(|| RowVersion::committed(0)))
    }

    /// Appends a row owned by the inserting transaction `tid`; it stays
    /// invisible to others until the transaction commits.
    pub fn append_uncommitted(
        &self,
        values: &[Value],
        tid: TransactionId,
    ) -> Result<RowId, TableError> {
        if !self.uses_mvcc() {
            return Err(TableError::MissingMvccData);
        }
        self.append_with_version(values, Some(RowVersion::uncommitted_insert(tid)))
    }

    fn append_with_version(
        &self,
        values: &[Value],
        version: Option<RowVersion>,
    ) -> Result<RowId, TableError> {
        if self.table_type == TableType::References {
            return Err(TableError::ReferenceTableAppend);
        }
        let _guard = self.append_lock.lock();

        let open_chunk = {
            let chunks = self.chunks.read();
            chunks
                .last()
                .filter(|last| !last.is_finalized() && last.size() < self.target_chunk_size)
                .map(|last| ((chunks.len() - 1) as ChunkId, Arc::clone(last)))
        };
        let (chunk_id, chunk) = match open_chunk {
            Some(open) => open,
            None => self.start_mutable_chunk(),
        };

        let offset = chunk.size() as ChunkOffset;
        chunk.append(values, &self.column_definitions, version)?;
        if chunk.size() >= self.target_chunk_size {
            chunk.finalize();
        }
        Ok(RowId::new(chunk_id, offset))
    }

    fn start_mutable_chunk(&self) -> (ChunkId, Arc<Chunk>) {
        let mut chunks = self.chunks.write();
        if let Some(last) = chunks.last() {
            last.finalize();
        }
        let chunk = Arc::new(Chunk::new_mutable(
            &self.column_definitions,
            self.uses_mvcc(),
        ));
        chunks.push(Arc::clone(&chunk));
        let chunk_id = (chunks.len() - 1) as ChunkId;
        debug!(target: "strata::table", chunk_id, "Started mutable chunk");
        (chunk_id, chunk)
    }

    /// Frees the rows of a chunk once every one of them has a committed
    /// delete. The slot is kept as an empty finalized chunk so the ids of
    /// later chunks do not shift.
    pub fn remove_chunk(&self, chunk_id: ChunkId) -> Result<(), TableError> {
        if self.table_type == TableType::References {
            return Err(TableError::ReferenceTableRemoval);
        }
        let _guard = self.append_lock.lock();
        let mut chunks = self.chunks.write();
        let slot = chunks
            .get_mut(chunk_id as usize)
            .ok_or(TableError::ChunkOutOfRange(chunk_id))?;
        let size = slot.size();
        let invalid = slot.invalid_row_count();
        if invalid < size {
            return Err(TableError::ChunkStillValid {
                chunk_id,
                valid_rows: size - invalid,
            });
        }

        let emptied = Chunk::new_mutable(&self.column_definitions, self.uses_mvcc());
        emptied.finalize();
        *slot = Arc::new(emptied);
        debug!(target: "strata::table", chunk_id, rows = size, "Removed chunk");
        Ok(())
    }

    /// Finalizes the last chunk so it can be encoded.
    pub fn finalize_last_chunk(&self) {
        if let Some(last) = self.chunks.read().last() {
            last.finalize();
        }
    }

    /// One row by its position in the table, counting across chunks.
    pub fn get_row(&self, row_index: u64) -> Result<Vec<Value>, TableError> {
        let mut remaining = row_index;
        for (chunk_id, chunk) in self.chunks().iter().enumerate() {
            let size = chunk.size() as u64;
            if remaining < size {
                return self.row(RowId::new(chunk_id as ChunkId, remaining as ChunkOffset));
            }
            remaining -= size;
        }
        Err(TableError::RowOutOfRange(row_index))
    }

    /// One row by its chunk-local address.
    pub fn row(&self, row_id: RowId) -> Result<Vec<Value>, TableError> {
        let chunk = self
            .get_chunk(row_id.chunk_id)
            .ok_or(TableError::ChunkOutOfRange(row_id.chunk_id))?;
        let data = chunk.snapshot();
        if row_id.chunk_offset as usize >= data.size() {
            return Err(TableError::RowOutOfRange(row_id.chunk_offset as u64));
        }
        data.segments()
            .iter()
            .map(|segment| segment.value_at(row_id.chunk_offset).map_err(TableError::from))
            .collect()
    }

    /// Every row, chunk by chunk.
    pub fn get_rows(&self) -> Result<Vec<Vec<Value>>, TableError> {
        let mut rows = Vec::with_capacity(self.row_count() as usize);
        for chunk in self.chunks() {
            let data = chunk.snapshot();
            let columns = data
                .segments()
                .iter()
                .map(|segment| segment.values())
                .collect::<Result<Vec<_>, _>>()?;
            let mut columns: Vec<_> = columns.into_iter().map(Vec::into_iter).collect();
            for _ in 0..data.size() {
                rows.push(
                    columns
                        .iter_mut()
                        .map(|column| column.next().unwrap_or(Value::Null))
                        .collect(),
                );
            }
        }
        Ok(rows)
    }

    pub fn estimate_memory_usage(&self) -> usize {
        std::mem::size_of::<Self>()
            + self
                .chunks
                .read()
                .iter()
                .map(|c| c.estimate_memory_usage())
                .sum::<usize>()
    }
}
