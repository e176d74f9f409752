use std::fmt;
use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataType {
    Int32,
    Int64,
    Float32,
    Float64,
    String,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Int32 => "int",
            DataType::Int64 => "long",
            DataType::Float32 => "float",
            DataType::Float64 => "double",
            DataType::String => "string",
        }
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        !matches!(self, DataType::String)
    }

    #[inline]
    pub fn is_integral(&self) -> bool {
        matches!(self, DataType::Int32 | DataType::Int64)
    }

    /// Whether values of both types may be compared with each other.
    pub fn is_comparable_with(&self, other: DataType) -> bool {
        self.is_numeric() == other.is_numeric()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "int32" => Ok(DataType::Int32),
            "long" | "int64" => Ok(DataType::Int64),
            "float" | "float32" => Ok(DataType::Float32),
            "double" | "float64" => Ok(DataType::Float64),
            "string" => Ok(DataType::String),
            other => Err(format!("unknown data type: {other}")),
        }
    }
}
