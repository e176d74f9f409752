//! Physical column storage for one chunk.
//!
//! A [`Segment`] tags its logical type, so callers pick the Rust type once
//! and then iterate without caring about the encoding underneath.

mod accessor;
mod dictionary_segment;
mod encoder;
mod encoding_type;
mod frame_of_reference_segment;
mod iterators;
mod lz4_segment;
mod reference_segment;
mod run_length_segment;
#[allow(clippy::module_inception)]
mod segment;
mod segment_position;
mod typed_segment;
mod value_segment;

pub use accessor::SegmentAccessor;
pub use dictionary_segment::{DictionaryCursor, DictionarySegment};
pub use encoder::{ChunkEncoder, SegmentEncodingSpec};
pub use encoding_type::EncodingType;
pub use frame_of_reference_segment::{
    FRAME_OF_REFERENCE_BLOCK_SIZE, FrameOfReferenceCursor, FrameOfReferenceSegment,
};
pub use iterators::{ChunkOffsetMapping, ColumnIter, PointAccessIter, SegmentIter};
pub use lz4_segment::{Lz4Cursor, Lz4Segment};
pub use reference_segment::ReferenceSegment;
pub use run_length_segment::{RunLengthCursor, RunLengthSegment};
pub use segment::Segment;
pub use segment_position::SegmentPosition;
pub use typed_segment::TypedSegment;
pub use value_segment::ValueSegment;

#[cfg(test)]
mod dictionary_segment_test;
#[cfg(test)]
mod encoder_test;
#[cfg(test)]
mod iterators_test;
#[cfg(test)]
mod lz4_segment_test;
#[cfg(test)]
mod segment_test;
