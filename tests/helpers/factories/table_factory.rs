use std::sync::Arc;

use super::ValueFactory;
use crate::engine::core::segment::{ChunkEncoder, SegmentEncodingSpec};
use crate::engine::core::table::{ColumnDefinition, Table, TableType, UseMvcc};
use crate::engine::types::{DataType, Value};

pub struct TableFactory {
    columns: Vec<ColumnDefinition>,
    chunk_size: usize,
    use_mvcc: UseMvcc,
    rows: Vec<Vec<Value>>,
    encoding: Option<SegmentEncodingSpec>,
}

impl TableFactory {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            chunk_size: 4,
            use_mvcc: UseMvcc::No,
            rows: Vec::new(),
            encoding: None,
        }
    }

    pub fn with_column(mut self, name: &str, data_type: DataType, nullable: bool) -> Self {
        self.columns
            .push(ColumnDefinition::new(name, data_type, nullable));
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_mvcc(mut self) -> Self {
        self.use_mvcc = UseMvcc::Yes;
        self
    }

    pub fn with_row(mut self, row: Vec<Value>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn with_rows(mut self, rows: Vec<Vec<Value>>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// `count` rows of deterministic random values matching the columns
    /// declared so far.
    pub fn with_random_rows(mut self, count: usize, values: &mut ValueFactory) -> Self {
        let columns: Vec<(DataType, bool)> = self
            .columns
            .iter()
            .map(|c| (c.data_type, c.nullable))
            .collect();
        self.rows.extend(values.rows(&columns, count));
        self
    }

    /// Encodes every chunk with `spec` once the rows are loaded.
    pub fn encoded(mut self, spec: SegmentEncodingSpec) -> Self {
        self.encoding = Some(spec);
        self
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn create(self) -> Arc<Table> {
        let table = Arc::new(Table::new(
            self.columns,
            TableType::Data,
            Some(self.chunk_size),
            self.use_mvcc,
        ));
        for row in &self.rows {
            table.append(row).expect("append row");
        }
        table.finalize_last_chunk();
        if let Some(spec) = self.encoding {
            ChunkEncoder::encode_all_chunks_uniform(&table, spec).expect("encode table");
        }
        table
    }
}
