use std::borrow::Cow;

use crate::engine::types::ChunkOffset;

/// One step of a segment iteration: the value, its null flag and the offset
/// it was produced for. The value of a null position is the type's default
/// and carries no meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPosition<'a, T: Clone> {
    value: Cow<'a, T>,
    is_null: bool,
    chunk_offset: ChunkOffset,
}

impl<'a, T: Clone + Default> SegmentPosition<'a, T> {
    pub fn new(value: Option<Cow<'a, T>>, chunk_offset: ChunkOffset) -> Self {
        match value {
            Some(value) => Self {
                value,
                is_null: false,
                chunk_offset,
            },
            None => Self::null(chunk_offset),
        }
    }

    pub fn null(chunk_offset: ChunkOffset) -> Self {
        Self {
            value: Cow::Owned(T::default()),
            is_null: true,
            chunk_offset,
        }
    }

    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.is_null
    }

    #[inline]
    pub fn chunk_offset(&self) -> ChunkOffset {
        self.chunk_offset
    }

    /// Value behind the null flag.
    pub fn as_option(&self) -> Option<&T> {
        (!self.is_null).then_some(&*self.value)
    }

    pub fn into_option(self) -> Option<T> {
        (!self.is_null).then(|| self.value.into_owned())
    }
}
