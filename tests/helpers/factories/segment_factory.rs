use crate::engine::core::segment::{
    ChunkEncoder, EncodingType, Segment, SegmentEncodingSpec, TypedSegment, ValueSegment,
};
use crate::engine::core::vector::VectorCompressionType;
use crate::engine::types::ColumnType;

/// Builds data segments from plain optional values.
pub struct SegmentFactory {
    spec: SegmentEncodingSpec,
}

impl SegmentFactory {
    pub fn new() -> Self {
        Self {
            spec: SegmentEncodingSpec::new(EncodingType::Unencoded),
        }
    }

    pub fn with_encoding(mut self, encoding_type: EncodingType) -> Self {
        self.spec.encoding_type = encoding_type;
        self
    }

    pub fn with_vector_compression(mut self, compression: VectorCompressionType) -> Self {
        self.spec.vector_compression = Some(compression);
        self
    }

    pub fn create<T: ColumnType>(&self, values: Vec<Option<T>>) -> Segment {
        let unencoded = Segment::from(TypedSegment::Value(ValueSegment::from_options(values)));
        if self.spec.encoding_type == EncodingType::Unencoded {
            return unencoded;
        }
        ChunkEncoder::encode_segment(&unencoded, self.spec).expect("encode segment")
    }

    pub fn create_all<T: ColumnType>(&self, values: &[T]) -> Segment {
        self.create(values.iter().cloned().map(Some).collect())
    }
}
