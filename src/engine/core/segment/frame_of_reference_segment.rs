use std::borrow::Cow;

use tracing::debug;

use crate::engine::core::column::NullBitmap;
use crate::engine::core::segment::EncodingType;
use crate::engine::core::vector::{CompressedVector, VectorCompressionType, VectorDecompressor};
use crate::engine::errors::EncodingError;
use crate::engine::types::ColumnType;

pub const FRAME_OF_REFERENCE_BLOCK_SIZE: usize = 2048;

/// Integral values stored as `value - minimum` of their 2048-row block.
///
/// Null rows do not take part in the minimum and store offset 0.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOfReferenceSegment<T> {
    block_minima: Vec<T>,
    offset_values: CompressedVector,
    null_values: Option<NullBitmap>,
}

impl<T: ColumnType> FrameOfReferenceSegment<T> {
    pub fn encode(
        values: &[T],
        null_values: Option<NullBitmap>,
        compression: VectorCompressionType,
    ) -> Result<Self, EncodingError> {
        if !T::DATA_TYPE.is_integral() {
            return Err(EncodingError::UnsupportedEncoding {
                encoding: EncodingType::FrameOfReference,
                data_type: T::DATA_TYPE,
            });
        }

        let is_null = |i: usize| null_values.as_ref().is_some_and(|n| n.is_null(i));
        let mut block_minima = Vec::with_capacity(values.len().div_ceil(FRAME_OF_REFERENCE_BLOCK_SIZE));
        let mut offsets = Vec::with_capacity(values.len());

        for (block, rows) in values.chunks(FRAME_OF_REFERENCE_BLOCK_SIZE).enumerate() {
            let base = block * FRAME_OF_REFERENCE_BLOCK_SIZE;
            let minimum = rows
                .iter()
                .enumerate()
                .filter(|(j, _)| !is_null(base + j))
                .map(|(_, v)| v)
                .min_by(|a, b| a.total_cmp(b))
                .cloned()
                .unwrap_or_default();

            for (j, value) in rows.iter().enumerate() {
                if is_null(base + j) {
                    offsets.push(0);
                    continue;
                }
                let delta = value.frame_delta(&minimum).ok_or_else(|| {
                    debug!(
                        target: "strata::segment",
                        block,
                        value = ?value,
                        minimum = ?minimum,
                        "Frame-of-reference offset does not fit 32 bits"
                    );
                    EncodingError::OffsetOverflow { block }
                })?;
                offsets.push(delta);
            }
            block_minima.push(minimum);
        }

        Ok(Self {
            block_minima,
            offset_values: CompressedVector::compress(&offsets, compression),
            null_values,
        })
    }

    pub fn block_minima(&self) -> &[T] {
        &self.block_minima
    }

    pub fn offset_values(&self) -> &CompressedVector {
        &self.offset_values
    }

    pub fn null_values(&self) -> Option<&NullBitmap> {
        self.null_values.as_ref()
    }

    pub fn compression_type(&self) -> VectorCompressionType {
        self.offset_values.compression_type()
    }

    pub fn len(&self) -> usize {
        self.offset_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offset_values.is_empty()
    }

    pub fn estimate_memory_usage(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.block_minima.capacity() * std::mem::size_of::<T>()
            + self.offset_values.data_size()
            + self.null_values.as_ref().map_or(0, NullBitmap::data_size)
    }

    pub fn cursor(&self) -> FrameOfReferenceCursor<'_, T> {
        FrameOfReferenceCursor {
            segment: self,
            offsets: self.offset_values.create_decompressor(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrameOfReferenceCursor<'a, T> {
    segment: &'a FrameOfReferenceSegment<T>,
    offsets: VectorDecompressor<'a>,
}

impl<'a, T: ColumnType> FrameOfReferenceCursor<'a, T> {
    #[inline]
    pub fn get(&mut self, offset: usize) -> Option<Cow<'a, T>> {
        let segment = self.segment;
        if segment.null_values.as_ref().is_some_and(|n| n.is_null(offset)) {
            return None;
        }
        let minimum = &segment.block_minima[offset / FRAME_OF_REFERENCE_BLOCK_SIZE];
        Some(Cow::Owned(T::from_frame(minimum, self.offsets.get(offset))))
    }
}
