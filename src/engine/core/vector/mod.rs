//! Packed storage for non-negative integers (value ids, frame offsets).
//!
//! Every codec hands out decompressors that own their state, so concurrent
//! readers of one vector never share mutable decoding buffers.

pub mod bit_packed;
pub mod compressed_vector;
pub mod fixed_size;

pub use bit_packed::{BitPacked128Decompressor, BitPacked128Vector};
pub use compressed_vector::{CompressedVector, VectorCompressionType, VectorDecompressor};
pub use fixed_size::{FixedSizeByteAlignedVector, FixedSizeDecompressor};

#[cfg(test)]
mod compressed_vector_test;
#[cfg(test)]
mod fixed_size_test;
