use std::borrow::Cow;
use std::cmp::Ordering;

use crate::engine::core::column::NullBitmap;
use crate::engine::core::vector::{CompressedVector, VectorCompressionType, VectorDecompressor};
use crate::engine::types::ColumnType;

/// Sorted unique dictionary plus one value id per row. Nulls use the id
/// one past the last dictionary entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DictionarySegment<T> {
    dictionary: Vec<T>,
    attribute_vector: CompressedVector,
    null_value_id: u32,
}

impl<T: ColumnType> DictionarySegment<T> {
    pub fn encode(
        values: &[T],
        null_values: Option<&NullBitmap>,
        compression: VectorCompressionType,
    ) -> Self {
        let is_null = |i: usize| null_values.is_some_and(|n| n.is_null(i));

        let mut dictionary: Vec<T> = values
            .iter()
            .enumerate()
            .filter(|(i, _)| !is_null(*i))
            .map(|(_, v)| v.clone())
            .collect();
        dictionary.sort_by(|a, b| a.total_cmp(b));
        dictionary.dedup_by(|a, b| a.total_cmp(b) == Ordering::Equal);

        let null_value_id = dictionary.len() as u32;
        let value_ids: Vec<u32> = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                if is_null(i) {
                    null_value_id
                } else {
                    dictionary.partition_point(|d| d.total_cmp(v) == Ordering::Less) as u32
                }
            })
            .collect();

        Self {
            dictionary,
            attribute_vector: CompressedVector::compress(&value_ids, compression),
            null_value_id,
        }
    }

    pub fn dictionary(&self) -> &[T] {
        &self.dictionary
    }

    pub fn attribute_vector(&self) -> &CompressedVector {
        &self.attribute_vector
    }

    pub fn null_value_id(&self) -> u32 {
        self.null_value_id
    }

    pub fn value_of_value_id(&self, value_id: u32) -> Option<&T> {
        self.dictionary.get(value_id as usize)
    }

    /// First value id whose entry is not less than `value`.
    pub fn lower_bound(&self, value: &T) -> u32 {
        self.dictionary
            .partition_point(|d| d.total_cmp(value) == Ordering::Less) as u32
    }

    /// First value id whose entry is greater than `value`.
    pub fn upper_bound(&self, value: &T) -> u32 {
        self.dictionary
            .partition_point(|d| d.total_cmp(value) != Ordering::Greater) as u32
    }

    pub fn len(&self) -> usize {
        self.attribute_vector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attribute_vector.is_empty()
    }

    pub fn compression_type(&self) -> VectorCompressionType {
        self.attribute_vector.compression_type()
    }

    pub fn estimate_memory_usage(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.dictionary.capacity() * std::mem::size_of::<T>()
            + self.dictionary.iter().map(ColumnType::heap_size).sum::<usize>()
            + self.attribute_vector.data_size()
    }

    pub fn cursor(&self) -> DictionaryCursor<'_, T> {
        DictionaryCursor {
            segment: self,
            value_ids: self.attribute_vector.create_decompressor(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DictionaryCursor<'a, T> {
    segment: &'a DictionarySegment<T>,
    value_ids: VectorDecompressor<'a>,
}

impl<'a, T: ColumnType> DictionaryCursor<'a, T> {
    #[inline]
    pub fn value_id(&mut self, offset: usize) -> u32 {
        self.value_ids.get(offset)
    }

    #[inline]
    pub fn get(&mut self, offset: usize) -> Option<Cow<'a, T>> {
        let segment = self.segment;
        let value_id = self.value_ids.get(offset);
        if value_id == segment.null_value_id {
            return None;
        }
        segment.dictionary.get(value_id as usize).map(Cow::Borrowed)
    }
}
