use std::borrow::Cow;
use std::cmp::Ordering;

use crate::engine::core::column::NullBitmap;
use crate::engine::types::{ChunkOffset, ColumnType};

/// Runs of equal values; `end_positions[i]` is the last offset of run `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunLengthSegment<T> {
    values: Vec<T>,
    null_values: Vec<bool>,
    end_positions: Vec<ChunkOffset>,
}

impl<T: ColumnType> RunLengthSegment<T> {
    pub fn encode(values: &[T], null_values: Option<&NullBitmap>) -> Self {
        let mut segment = Self {
            values: Vec::new(),
            null_values: Vec::new(),
            end_positions: Vec::new(),
        };

        for (offset, value) in values.iter().enumerate() {
            let is_null = null_values.is_some_and(|n| n.is_null(offset));
            let continues_run = match (segment.values.last(), segment.null_values.last()) {
                (Some(_), Some(true)) => is_null,
                (Some(last), Some(false)) => {
                    !is_null && last.total_cmp(value) == Ordering::Equal
                }
                _ => false,
            };

            if continues_run {
                if let Some(end) = segment.end_positions.last_mut() {
                    *end = offset as ChunkOffset;
                }
                continue;
            }
            segment
                .values
                .push(if is_null { T::default() } else { value.clone() });
            segment.null_values.push(is_null);
            segment.end_positions.push(offset as ChunkOffset);
        }

        segment
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn null_values(&self) -> &[bool] {
        &self.null_values
    }

    pub fn end_positions(&self) -> &[ChunkOffset] {
        &self.end_positions
    }

    pub fn run_count(&self) -> usize {
        self.values.len()
    }

    pub fn len(&self) -> usize {
        self.end_positions.last().map_or(0, |&end| end as usize + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.end_positions.is_empty()
    }

    /// Run containing `offset`.
    pub fn run_of(&self, offset: usize) -> usize {
        self.end_positions
            .partition_point(|&end| (end as usize) < offset)
    }

    fn run_start(&self, run: usize) -> usize {
        if run == 0 {
            0
        } else {
            self.end_positions[run - 1] as usize + 1
        }
    }

    pub fn estimate_memory_usage(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.values.capacity() * std::mem::size_of::<T>()
            + self.values.iter().map(ColumnType::heap_size).sum::<usize>()
            + self.null_values.capacity()
            + self.end_positions.capacity() * std::mem::size_of::<ChunkOffset>()
    }

    pub fn cursor(&self) -> RunLengthCursor<'_, T> {
        RunLengthCursor {
            segment: self,
            run: 0,
        }
    }
}

/// Remembers the last run so sequential reads skip the binary search.
#[derive(Debug, Clone)]
pub struct RunLengthCursor<'a, T> {
    segment: &'a RunLengthSegment<T>,
    run: usize,
}

impl<'a, T: ColumnType> RunLengthCursor<'a, T> {
    #[inline]
    pub fn get(&mut self, offset: usize) -> Option<Cow<'a, T>> {
        let segment = self.segment;
        let cached = self.run < segment.run_count()
            && segment.run_start(self.run) <= offset
            && offset <= segment.end_positions[self.run] as usize;
        if !cached {
            self.run = segment.run_of(offset);
        }
        if segment.null_values[self.run] {
            None
        } else {
            Some(Cow::Borrowed(&segment.values[self.run]))
        }
    }
}
