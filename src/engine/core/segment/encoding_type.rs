use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::types::DataType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EncodingType {
    #[default]
    Unencoded,
    Dictionary,
    RunLength,
    FrameOfReference,
    #[serde(rename = "LZ4", alias = "Lz4")]
    Lz4,
}

impl EncodingType {
    pub const ALL: [EncodingType; 5] = [
        EncodingType::Unencoded,
        EncodingType::Dictionary,
        EncodingType::RunLength,
        EncodingType::FrameOfReference,
        EncodingType::Lz4,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EncodingType::Unencoded => "Unencoded",
            EncodingType::Dictionary => "Dictionary",
            EncodingType::RunLength => "RunLength",
            EncodingType::FrameOfReference => "FrameOfReference",
            EncodingType::Lz4 => "LZ4",
        }
    }

    pub fn supports(&self, data_type: DataType) -> bool {
        match self {
            EncodingType::FrameOfReference => data_type.is_integral(),
            _ => true,
        }
    }

    /// Whether the encoding stores its per-row integers in a compressed vector.
    pub fn uses_vector_compression(&self) -> bool {
        matches!(
            self,
            EncodingType::Dictionary | EncodingType::FrameOfReference
        )
    }
}

impl fmt::Display for EncodingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncodingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Unencoded" => Ok(EncodingType::Unencoded),
            "Dictionary" => Ok(EncodingType::Dictionary),
            "RunLength" => Ok(EncodingType::RunLength),
            "FrameOfReference" => Ok(EncodingType::FrameOfReference),
            "LZ4" | "Lz4" => Ok(EncodingType::Lz4),
            other => Err(format!("unknown encoding: {other}")),
        }
    }
}
