use super::{
    ChunkOffsetMapping, DictionarySegment, EncodingType, FrameOfReferenceSegment, Lz4Segment,
    PointAccessIter, RunLengthSegment, SegmentAccessor, SegmentIter, ValueSegment,
};
use crate::engine::core::column::NullBitmap;
use crate::engine::core::vector::VectorCompressionType;
use crate::engine::errors::EncodingError;
use crate::engine::types::ColumnType;

/// A data segment of logical type `T`, in one of the physical encodings.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedSegment<T> {
    Value(ValueSegment<T>),
    Dictionary(DictionarySegment<T>),
    RunLength(RunLengthSegment<T>),
    Lz4(Lz4Segment<T>),
    FrameOfReference(FrameOfReferenceSegment<T>),
}

impl<T: ColumnType> TypedSegment<T> {
    pub fn len(&self) -> usize {
        match self {
            TypedSegment::Value(s) => s.len(),
            TypedSegment::Dictionary(s) => s.len(),
            TypedSegment::RunLength(s) => s.len(),
            TypedSegment::Lz4(s) => s.len(),
            TypedSegment::FrameOfReference(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn encoding_type(&self) -> EncodingType {
        match self {
            TypedSegment::Value(_) => EncodingType::Unencoded,
            TypedSegment::Dictionary(_) => EncodingType::Dictionary,
            TypedSegment::RunLength(_) => EncodingType::RunLength,
            TypedSegment::Lz4(_) => EncodingType::Lz4,
            TypedSegment::FrameOfReference(_) => EncodingType::FrameOfReference,
        }
    }

    pub fn vector_compression(&self) -> Option<VectorCompressionType> {
        match self {
            TypedSegment::Dictionary(s) => Some(s.compression_type()),
            TypedSegment::FrameOfReference(s) => Some(s.compression_type()),
            _ => None,
        }
    }

    pub fn estimate_memory_usage(&self) -> usize {
        match self {
            TypedSegment::Value(s) => s.estimate_memory_usage(),
            TypedSegment::Dictionary(s) => s.estimate_memory_usage(),
            TypedSegment::RunLength(s) => s.estimate_memory_usage(),
            TypedSegment::Lz4(s) => s.estimate_memory_usage(),
            TypedSegment::FrameOfReference(s) => s.estimate_memory_usage(),
        }
    }

    /// Fresh point-access cursor. Only LZ4 can fail, while decompressing.
    pub fn accessor(&self) -> Result<SegmentAccessor<'_, T>, EncodingError> {
        Ok(match self {
            TypedSegment::Value(s) => SegmentAccessor::Value(s),
            TypedSegment::Dictionary(s) => SegmentAccessor::Dictionary(s.cursor()),
            TypedSegment::RunLength(s) => SegmentAccessor::RunLength(s.cursor()),
            TypedSegment::Lz4(s) => SegmentAccessor::Lz4(s.cursor()?),
            TypedSegment::FrameOfReference(s) => SegmentAccessor::FrameOfReference(s.cursor()),
        })
    }

    pub fn iter(&self) -> Result<SegmentIter<'_, T>, EncodingError> {
        Ok(SegmentIter::new(self.accessor()?, self.len()))
    }

    /// Iterates the rows named by `mappings`. Every referenced offset must be
    /// below [`len`](Self::len).
    pub fn point_iter<I>(
        &self,
        mappings: I,
    ) -> Result<PointAccessIter<'_, T, I::IntoIter>, EncodingError>
    where
        I: IntoIterator<Item = ChunkOffsetMapping>,
    {
        Ok(PointAccessIter::new(self.accessor()?, mappings.into_iter()))
    }

    pub fn value_at(&self, offset: usize) -> Result<Option<T>, EncodingError> {
        Ok(self.accessor()?.get(offset).map(|v| v.into_owned()))
    }

    /// Decodes every row into plain values plus a bitmap when any row is null.
    pub fn materialize(&self) -> Result<(Vec<T>, Option<NullBitmap>), EncodingError> {
        let mut values = Vec::with_capacity(self.len());
        let mut nulls = NullBitmap::new();
        for position in self.iter()? {
            nulls.push(position.is_null());
            values.push(position.into_option().unwrap_or_default());
        }
        Ok((values, nulls.has_nulls().then_some(nulls)))
    }
}
