pub mod compression_codec;

pub use compression_codec::{CompressionCodec, Lz4Codec};
