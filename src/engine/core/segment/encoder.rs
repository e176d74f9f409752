use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    DictionarySegment, EncodingType, FrameOfReferenceSegment, Lz4Segment, RunLengthSegment,
    Segment, TypedSegment, ValueSegment,
};
use crate::engine::core::chunk::Chunk;
use crate::engine::core::table::Table;
use crate::engine::core::vector::VectorCompressionType;
use crate::engine::errors::{EncodingError, TableError};
use crate::engine::types::{ColumnType, resolve_data_type};
use crate::shared::config::CONFIG;

/// Target encoding of one segment. Without an explicit vector compression the
/// default compression is used by encodings that need one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SegmentEncodingSpec {
    pub encoding_type: EncodingType,
    #[serde(default)]
    pub vector_compression: Option<VectorCompressionType>,
}

impl SegmentEncodingSpec {
    pub fn new(encoding_type: EncodingType) -> Self {
        Self {
            encoding_type,
            vector_compression: None,
        }
    }

    pub fn with_vector_compression(mut self, compression: VectorCompressionType) -> Self {
        self.vector_compression = Some(compression);
        self
    }

    /// Storage defaults from the loaded configuration.
    pub fn from_config() -> Self {
        Self::new(CONFIG.storage.default_encoding)
            .with_vector_compression(CONFIG.storage.vector_compression)
    }

    fn compression(&self) -> VectorCompressionType {
        self.vector_compression.unwrap_or_default()
    }
}

/// Re-encodes finalized chunks.
pub struct ChunkEncoder;

impl ChunkEncoder {
    /// Encodes one data segment. The input is left untouched.
    pub fn encode_segment(
        segment: &Segment,
        spec: SegmentEncodingSpec,
    ) -> Result<Segment, EncodingError> {
        if segment.is_reference() {
            return Err(EncodingError::ReferenceSegment);
        }
        let data_type = segment.data_type();
        if !spec.encoding_type.supports(data_type) {
            return Err(EncodingError::UnsupportedEncoding {
                encoding: spec.encoding_type,
                data_type,
            });
        }
        resolve_data_type!(data_type, T => {
            let typed = segment.typed::<T>()?;
            Ok(Segment::from(encode_typed(typed, spec)?))
        })
    }

    /// Encodes every column of a finalized chunk with its own spec and swaps
    /// the new segments in at once. Sort metadata survives: encoding never
    /// reorders rows.
    pub fn encode_chunk(chunk: &Chunk, specs: &[SegmentEncodingSpec]) -> Result<(), TableError> {
        if !chunk.is_finalized() {
            return Err(EncodingError::ChunkNotFinalized.into());
        }
        let data = chunk.snapshot();
        if specs.len() != data.column_count() {
            return Err(TableError::ArityMismatch {
                expected: data.column_count(),
                actual: specs.len(),
            });
        }

        let encoded = data
            .segments()
            .iter()
            .zip(specs)
            .map(|(segment, spec)| Self::encode_segment(segment, *spec).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(
                target: "strata::encoder",
                rows = chunk.size(),
                specs = ?specs,
                "Encoded chunk"
            );
        }
        chunk.replace_segments(encoded, true)
    }

    /// Encodes all chunks of `table` with one spec per column.
    pub fn encode_all_chunks(table: &Table, specs: &[SegmentEncodingSpec]) -> Result<(), TableError> {
        let chunks = table.chunks();
        for chunk in &chunks {
            Self::encode_chunk(chunk, specs)?;
        }
        info!(
            target: "strata::encoder",
            chunks = chunks.len(),
            columns = specs.len(),
            "Encoded table"
        );
        Ok(())
    }

    /// Encodes all chunks of `table` with the same spec for every column.
    pub fn encode_all_chunks_uniform(
        table: &Table,
        spec: SegmentEncodingSpec,
    ) -> Result<(), TableError> {
        let specs = vec![spec; table.column_count()];
        Self::encode_all_chunks(table, &specs)
    }
}

fn encode_typed<T: ColumnType>(
    segment: &TypedSegment<T>,
    spec: SegmentEncodingSpec,
) -> Result<TypedSegment<T>, EncodingError> {
    let (values, null_values) = segment.materialize()?;
    Ok(match spec.encoding_type {
        EncodingType::Unencoded => TypedSegment::Value(ValueSegment::from_parts(values, null_values)),
        EncodingType::Dictionary => TypedSegment::Dictionary(DictionarySegment::encode(
            &values,
            null_values.as_ref(),
            spec.compression(),
        )),
        EncodingType::RunLength => {
            TypedSegment::RunLength(RunLengthSegment::encode(&values, null_values.as_ref()))
        }
        EncodingType::Lz4 => TypedSegment::Lz4(Lz4Segment::encode(&values, null_values)?),
        EncodingType::FrameOfReference => TypedSegment::FrameOfReference(
            FrameOfReferenceSegment::encode(&values, null_values, spec.compression())?,
        ),
    })
}
