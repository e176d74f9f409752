use std::borrow::Cow;

use crate::engine::core::column::NullBitmap;
use crate::engine::types::ColumnType;

/// Unencoded values. The only segment kind that accepts appends.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSegment<T> {
    values: Vec<T>,
    null_values: Option<NullBitmap>,
}

impl<T: ColumnType> ValueSegment<T> {
    pub fn new(nullable: bool) -> Self {
        Self {
            values: Vec::new(),
            null_values: nullable.then(NullBitmap::new),
        }
    }

    pub fn from_parts(values: Vec<T>, null_values: Option<NullBitmap>) -> Self {
        debug_assert!(null_values.as_ref().is_none_or(|n| n.len() == values.len()));
        Self {
            values,
            null_values,
        }
    }

    pub fn from_options<I: IntoIterator<Item = Option<T>>>(values: I) -> Self {
        let mut segment = Self::new(false);
        for value in values {
            segment.push(value);
        }
        segment
    }

    /// Appends one row. A null on a segment without a bitmap starts one.
    pub fn push(&mut self, value: Option<T>) {
        let is_null = value.is_none();
        if is_null && self.null_values.is_none() {
            self.null_values = Some(NullBitmap::with_len(self.values.len()));
        }
        self.values.push(value.unwrap_or_default());
        if let Some(nulls) = self.null_values.as_mut() {
            nulls.push(is_null);
        }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn null_values(&self) -> Option<&NullBitmap> {
        self.null_values.as_ref()
    }

    pub fn is_nullable(&self) -> bool {
        self.null_values.is_some()
    }

    #[inline]
    pub fn is_null(&self, offset: usize) -> bool {
        self.null_values.as_ref().is_some_and(|n| n.is_null(offset))
    }

    #[inline]
    pub fn get(&self, offset: usize) -> Option<Cow<'_, T>> {
        (!self.is_null(offset)).then(|| Cow::Borrowed(&self.values[offset]))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn estimate_memory_usage(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.values.capacity() * std::mem::size_of::<T>()
            + self.values.iter().map(ColumnType::heap_size).sum::<usize>()
            + self.null_values.as_ref().map_or(0, NullBitmap::data_size)
    }
}
