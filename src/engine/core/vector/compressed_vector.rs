use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{
    BitPacked128Decompressor, BitPacked128Vector, FixedSizeByteAlignedVector,
    FixedSizeDecompressor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VectorCompressionType {
    #[default]
    #[serde(rename = "Fixed-size byte-aligned", alias = "FixedSizeByteAligned")]
    FixedSizeByteAligned,
    #[serde(rename = "SIMD-BP128", alias = "BitPacked128")]
    BitPacked128,
}

impl VectorCompressionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VectorCompressionType::FixedSizeByteAligned => "Fixed-size byte-aligned",
            VectorCompressionType::BitPacked128 => "SIMD-BP128",
        }
    }
}

impl fmt::Display for VectorCompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VectorCompressionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Fixed-size byte-aligned" | "FixedSizeByteAligned" => {
                Ok(VectorCompressionType::FixedSizeByteAligned)
            }
            "SIMD-BP128" | "BitPacked128" | "SimdBp128" => Ok(VectorCompressionType::BitPacked128),
            other => Err(format!("unknown vector compression: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressedVector {
    FixedSize(FixedSizeByteAlignedVector),
    BitPacked(BitPacked128Vector),
}

impl CompressedVector {
    pub fn compress(values: &[u32], compression: VectorCompressionType) -> Self {
        match compression {
            VectorCompressionType::FixedSizeByteAligned => {
                Self::FixedSize(FixedSizeByteAlignedVector::compress(values))
            }
            VectorCompressionType::BitPacked128 => {
                Self::BitPacked(BitPacked128Vector::compress(values))
            }
        }
    }

    pub fn compression_type(&self) -> VectorCompressionType {
        match self {
            Self::FixedSize(_) => VectorCompressionType::FixedSizeByteAligned,
            Self::BitPacked(_) => VectorCompressionType::BitPacked128,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::FixedSize(v) => v.len(),
            Self::BitPacked(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data_size(&self) -> usize {
        match self {
            Self::FixedSize(v) => v.data_size(),
            Self::BitPacked(v) => v.data_size(),
        }
    }

    pub fn create_decompressor(&self) -> VectorDecompressor<'_> {
        match self {
            Self::FixedSize(v) => VectorDecompressor::FixedSize(v.create_decompressor()),
            Self::BitPacked(v) => VectorDecompressor::BitPacked(v.create_decompressor()),
        }
    }

    /// Sequential traversal through a fresh decompressor.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        let mut decompressor = self.create_decompressor();
        (0..self.len()).map(move |i| decompressor.get(i))
    }
}

#[derive(Debug, Clone)]
pub enum VectorDecompressor<'a> {
    FixedSize(FixedSizeDecompressor<'a>),
    BitPacked(BitPacked128Decompressor<'a>),
}

impl VectorDecompressor<'_> {
    #[inline]
    pub fn get(&mut self, i: usize) -> u32 {
        match self {
            Self::FixedSize(d) => d.get(i),
            Self::BitPacked(d) => d.get(i),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::FixedSize(d) => d.len(),
            Self::BitPacked(d) => d.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
