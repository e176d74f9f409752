use thiserror::Error;
use tracing::{debug, error};

use crate::engine::core::segment::EncodingType;
use crate::engine::types::{ChunkId, ColumnId, DataType, RowId, TransactionId, Value};

/// Errors raised while building or decoding segments.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("{encoding} encoding does not support {data_type} columns")]
    UnsupportedEncoding {
        encoding: EncodingType,
        data_type: DataType,
    },

    #[error("Frame-of-reference block {block} spans more than 32 bits")]
    OffsetOverflow { block: usize },

    #[error("Reference segments cannot be encoded")]
    ReferenceSegment,

    #[error("Segment holds {actual} values, {requested} requested")]
    TypeMismatch {
        requested: DataType,
        actual: DataType,
    },

    #[error("Compression failed: {0}")]
    Compression(String),

    #[error("Decompression failed: {0}")]
    Decompression(String),

    #[error("Corrupted segment payload: {0}")]
    Corrupted(String),

    #[error("Reference to missing row {0}")]
    DanglingReference(RowId),

    #[error("Chunk must be finalized before encoding")]
    ChunkNotFinalized,
}

/// Errors raised by the table/chunk object model.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Row has {actual} values, table has {expected} columns")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("Value {value} does not fit column '{column}' of type {expected}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        value: Value,
    },

    #[error("Column '{column}' is not nullable")]
    NullViolation { column: String },

    #[error("Chunk is immutable")]
    ChunkImmutable,

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column id {0} out of range")]
    ColumnOutOfRange(ColumnId),

    #[error("Chunk id {0} out of range")]
    ChunkOutOfRange(ChunkId),

    #[error("Row index {0} out of range")]
    RowOutOfRange(u64),

    #[error("Reference segments must point to data tables")]
    NestedReference,

    #[error("Rows cannot be appended to a reference table")]
    ReferenceTableAppend,

    #[error("Chunks cannot be removed from a reference table")]
    ReferenceTableRemoval,

    #[error("Chunk {chunk_id} still has {valid_rows} row(s) without a committed delete")]
    ChunkStillValid { chunk_id: ChunkId, valid_rows: usize },

    #[error("Table has no MVCC data")]
    MissingMvccData,

    #[error("Invalid chunk: {0}")]
    InvalidChunk(String),

    #[error("Malformed sort metadata on column {column_id}: {reason}")]
    MalformedSortMetadata { column_id: ColumnId, reason: String },

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),
}

/// Errors raised by the index bridge.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Index requires {expected} segments, column {column_id} is {actual}")]
    EncodingMismatch {
        column_id: ColumnId,
        expected: EncodingType,
        actual: String,
    },

    #[error("No index covers columns {columns:?}")]
    MissingIndex { columns: Vec<ColumnId> },

    #[error("Index supports {supported} column(s), {requested} requested")]
    UnsupportedColumnCount { supported: usize, requested: usize },

    #[error("Index lookup expects {expected} value(s), got {actual}")]
    InvalidValueCount { expected: usize, actual: usize },

    #[error("Value {value} cannot be looked up in a {data_type} index")]
    IncompatibleValue { data_type: DataType, value: Value },

    #[error("Column id {0} out of range")]
    ColumnOutOfRange(ColumnId),
}

/// Errors that abort a scan or validate pass. None of them touch chunk state.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(
        "Cannot compare {left_kind} segment (column {left_column}) with {right_kind} segment (column {right_column})"
    )]
    InvalidSegmentPairing {
        left_column: ColumnId,
        left_kind: &'static str,
        right_column: ColumnId,
        right_kind: &'static str,
    },

    #[error(
        "Cannot compare column {left_column} ({left_type}) with column {right_column} ({right_type})"
    )]
    IncompatibleTypes {
        left_column: ColumnId,
        left_type: DataType,
        right_column: ColumnId,
        right_type: DataType,
    },

    #[error("Cannot compare column {column_id} ({data_type}) with literal {literal}")]
    IncompatibleLiteral {
        column_id: ColumnId,
        data_type: DataType,
        literal: Value,
    },

    #[error("Column id {0} out of range")]
    ColumnOutOfRange(ColumnId),

    #[error("Chunk id {0} out of range")]
    ChunkOutOfRange(ChunkId),

    #[error("Table has no MVCC data to validate against")]
    MissingMvccData,

    #[error("Scan cancelled")]
    Cancelled,

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),
}

impl ScanError {
    pub fn log_error(&self) {
        match self {
            ScanError::InvalidSegmentPairing { .. } | ScanError::IncompatibleTypes { .. } => {
                error!("Invalid operand pairing: {}", self);
                debug!("Operand pairing error details: {:?}", self);
            }
            ScanError::IncompatibleLiteral { .. } => {
                error!("Invalid literal: {}", self);
                debug!("Literal error details: {:?}", self);
            }
            ScanError::ColumnOutOfRange(_) | ScanError::ChunkOutOfRange(_) => {
                error!("Invalid scan target: {}", self);
                debug!("Scan target error details: {:?}", self);
            }
            ScanError::MissingMvccData => {
                error!("Validate on a table without MVCC data");
            }
            ScanError::Cancelled => {
                debug!("Scan cancelled between chunks");
            }
            ScanError::Encoding(e) => {
                error!("Segment encoding error: {}", e);
                debug!("Segment encoding error details: {:?}", e);
            }
            ScanError::Index(e) => {
                error!("Index error: {}", e);
                debug!("Index error details: {:?}", e);
            }
            ScanError::Table(e) => {
                error!("Table error: {}", e);
                debug!("Table error details: {:?}", e);
            }
        }
    }
}

/// Errors raised while writing MVCC state.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Row {row} is locked by transaction {owner}")]
    WriteConflict { row: RowId, owner: TransactionId },

    #[error("Row {0} has no MVCC data")]
    MissingMvccData(RowId),

    #[error("Row {0} does not exist")]
    RowOutOfRange(RowId),

    #[error("Row {row} is not claimed by transaction {transaction_id}")]
    RowNotClaimed {
        row: RowId,
        transaction_id: TransactionId,
    },
}
