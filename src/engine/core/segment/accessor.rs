use std::borrow::Cow;

use super::{
    DictionaryCursor, FrameOfReferenceCursor, Lz4Cursor, RunLengthCursor, ValueSegment,
};
use crate::engine::types::ColumnType;

/// Point-access cursor over one typed segment.
///
/// Every cursor owns its decompression state, so two cursors over the same
/// segment never interfere.
#[derive(Debug, Clone)]
pub enum SegmentAccessor<'a, T> {
    Value(&'a ValueSegment<T>),
    Dictionary(DictionaryCursor<'a, T>),
    RunLength(RunLengthCursor<'a, T>),
    Lz4(Lz4Cursor<'a, T>),
    FrameOfReference(FrameOfReferenceCursor<'a, T>),
}

impl<'a, T: ColumnType> SegmentAccessor<'a, T> {
    /// Value at `offset`, `None` when the row is null.
    #[inline]
    pub fn get(&mut self, offset: usize) -> Option<Cow<'a, T>> {
        match self {
            SegmentAccessor::Value(segment) => {
                let segment: &'a ValueSegment<T> = *segment;
                segment.get(offset)
            }
            SegmentAccessor::Dictionary(cursor) => cursor.get(offset),
            SegmentAccessor::RunLength(cursor) => cursor.get(offset),
            SegmentAccessor::Lz4(cursor) => cursor.get(offset),
            SegmentAccessor::FrameOfReference(cursor) => cursor.get(offset),
        }
    }
}
