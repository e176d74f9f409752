use std::borrow::Cow;

use super::{SegmentAccessor, SegmentPosition};
use crate::engine::types::{ChunkOffset, ColumnType};

/// Pairs a row of the referenced chunk with the position-list slot it fills.
///
/// The two offsets are kept apart on purpose: iterators read at
/// `offset_in_referenced_chunk` and report `offset_in_poslist`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkOffsetMapping {
    pub offset_in_poslist: ChunkOffset,
    pub offset_in_referenced_chunk: ChunkOffset,
}

/// Yields every row of a segment in offset order.
#[derive(Debug, Clone)]
pub struct SegmentIter<'a, T> {
    accessor: SegmentAccessor<'a, T>,
    next_offset: usize,
    len: usize,
}

impl<'a, T: ColumnType> SegmentIter<'a, T> {
    pub(crate) fn new(accessor: SegmentAccessor<'a, T>, len: usize) -> Self {
        Self {
            accessor,
            next_offset: 0,
            len,
        }
    }
}

impl<'a, T: ColumnType> Iterator for SegmentIter<'a, T> {
    type Item = SegmentPosition<'a, T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.next_offset >= self.len {
            return None;
        }
        let offset = self.next_offset;
        self.next_offset += 1;
        Some(SegmentPosition::new(
            self.accessor.get(offset),
            offset as ChunkOffset,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next_offset;
        (remaining, Some(remaining))
    }
}

impl<T: ColumnType> ExactSizeIterator for SegmentIter<'_, T> {}

/// Yields the rows named by a list of mappings, in mapping order.
#[derive(Debug, Clone)]
pub struct PointAccessIter<'a, T, I> {
    accessor: SegmentAccessor<'a, T>,
    mappings: I,
}

impl<'a, T, I> PointAccessIter<'a, T, I>
where
    T: ColumnType,
    I: Iterator<Item = ChunkOffsetMapping>,
{
    pub(crate) fn new(accessor: SegmentAccessor<'a, T>, mappings: I) -> Self {
        Self { accessor, mappings }
    }
}

impl<'a, T, I> Iterator for PointAccessIter<'a, T, I>
where
    T: ColumnType,
    I: Iterator<Item = ChunkOffsetMapping>,
{
    type Item = SegmentPosition<'a, T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let mapping = self.mappings.next()?;
        let value = self
            .accessor
            .get(mapping.offset_in_referenced_chunk as usize);
        Some(SegmentPosition::new(value, mapping.offset_in_poslist))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.mappings.size_hint()
    }
}

/// Iteration over any segment, data or reference.
///
/// Reference segments are resolved eagerly chunk by chunk, so their
/// iterator owns the values and reports offsets into the position list.
#[derive(Debug)]
pub enum ColumnIter<'a, T> {
    Sequential(SegmentIter<'a, T>),
    Point(PointAccessIter<'a, T, std::vec::IntoIter<ChunkOffsetMapping>>),
    Resolved(std::vec::IntoIter<(ChunkOffset, Option<T>)>),
}

impl<'a, T: ColumnType> Iterator for ColumnIter<'a, T> {
    type Item = SegmentPosition<'a, T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ColumnIter::Sequential(iter) => iter.next(),
            ColumnIter::Point(iter) => iter.next(),
            ColumnIter::Resolved(iter) => {
                let (offset, value) = iter.next()?;
                Some(SegmentPosition::new(value.map(Cow::Owned), offset))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            ColumnIter::Sequential(iter) => iter.size_hint(),
            ColumnIter::Point(iter) => iter.size_hint(),
            ColumnIter::Resolved(iter) => iter.size_hint(),
        }
    }
}
