use std::borrow::Cow;

use crate::engine::core::column::NullBitmap;
use crate::engine::core::column::compression::{CompressionCodec, Lz4Codec};
use crate::engine::errors::EncodingError;
use crate::engine::types::ColumnType;

/// Values serialized back to back and compressed as one LZ4 block.
#[derive(Debug, Clone, PartialEq)]
pub struct Lz4Segment<T> {
    compressed: Vec<u8>,
    decompressed_size: usize,
    null_values: Option<NullBitmap>,
    len: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T: ColumnType> Lz4Segment<T> {
    pub fn encode(values: &[T], null_values: Option<NullBitmap>) -> Result<Self, EncodingError> {
        let mut raw = Vec::with_capacity(values.len() * std::mem::size_of::<T>());
        for value in values {
            value.encode_bytes(&mut raw);
        }
        let compressed = Lz4Codec.compress(&raw)?;
        Ok(Self {
            compressed,
            decompressed_size: raw.len(),
            null_values,
            len: values.len(),
            _marker: std::marker::PhantomData,
        })
    }

    pub fn decompress(&self) -> Result<Vec<T>, EncodingError> {
        let raw = Lz4Codec.decompress(&self.compressed, self.decompressed_size)?;
        let mut pos = 0;
        let mut values = Vec::with_capacity(self.len);
        for row in 0..self.len {
            let value = T::decode_bytes(&raw, &mut pos).ok_or_else(|| {
                EncodingError::Corrupted(format!("LZ4 payload ends before row {row}"))
            })?;
            values.push(value);
        }
        if pos != raw.len() {
            return Err(EncodingError::Corrupted(format!(
                "LZ4 payload has {} trailing bytes",
                raw.len() - pos
            )));
        }
        Ok(values)
    }

    pub fn null_values(&self) -> Option<&NullBitmap> {
        self.null_values.as_ref()
    }

    pub fn compressed_size(&self) -> usize {
        self.compressed.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn estimate_memory_usage(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.compressed.capacity()
            + self.null_values.as_ref().map_or(0, NullBitmap::data_size)
    }

    /// Decompresses the whole segment into a buffer owned by the cursor.
    pub fn cursor(&self) -> Result<Lz4Cursor<'_, T>, EncodingError> {
        Ok(Lz4Cursor {
            values: self.decompress()?,
            null_values: self.null_values.as_ref(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Lz4Cursor<'a, T> {
    values: Vec<T>,
    null_values: Option<&'a NullBitmap>,
}

impl<'a, T: ColumnType> Lz4Cursor<'a, T> {
    #[inline]
    pub fn get(&mut self, offset: usize) -> Option<Cow<'a, T>> {
        if self.null_values.is_some_and(|n| n.is_null(offset)) {
            return None;
        }
        Some(Cow::Owned(self.values[offset].clone()))
    }
}
