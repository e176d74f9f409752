use crate::engine::errors::EncodingError;

use lz4_flex::block::{
    compress_prepend_size as lz4_compress, decompress_size_prepended as lz4_decompress,
};

pub const ALGO_LZ4: u16 = 0x0001;

pub trait CompressionCodec {
    fn algo_id(&self) -> u16;
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, EncodingError>;
    fn decompress(&self, input: &[u8], uncompressed_len: usize) -> Result<Vec<u8>, EncodingError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4Codec;

impl CompressionCodec for Lz4Codec {
    fn algo_id(&self) -> u16 {
        ALGO_LZ4
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, EncodingError> {
        Ok(lz4_compress(input))
    }

    fn decompress(&self, input: &[u8], uncompressed_len: usize) -> Result<Vec<u8>, EncodingError> {
        let out = lz4_decompress(input)
            .map_err(|e| EncodingError::Decompression(format!("lz4 decompress: {e}")))?;
        if out.len() != uncompressed_len {
            return Err(EncodingError::Decompression(format!(
                "lz4 produced {} bytes, expected {}",
                out.len(),
                uncompressed_len
            )));
        }
        Ok(out)
    }
}
