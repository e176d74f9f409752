use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use super::{DataType, Scalar};

/// A single cell value of any supported logical type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
}

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Logical type of the value, `None` for `Null`.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Int32(_) => Some(DataType::Int32),
            Value::Int64(_) => Some(DataType::Int64),
            Value::Float32(_) => Some(DataType::Float32),
            Value::Float64(_) => Some(DataType::Float64),
            Value::String(_) => Some(DataType::String),
        }
    }

    pub fn as_scalar(&self) -> Option<Scalar<'_>> {
        match self {
            Value::Null => None,
            Value::Int32(v) => Some(Scalar::Int(*v as i64)),
            Value::Int64(v) => Some(Scalar::Int(*v)),
            Value::Float32(v) => Some(Scalar::Float(*v as f64)),
            Value::Float64(v) => Some(Scalar::Float(*v)),
            Value::String(v) => Some(Scalar::Str(v.as_str())),
        }
    }

    /// Compares two non-null values; `None` when either is null or the types
    /// cannot be compared.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        self.as_scalar()?.partial_cmp(&other.as_scalar()?)
    }

    /// Whether this value may be compared with a column of `data_type`.
    pub fn is_comparable_with(&self, data_type: DataType) -> bool {
        match self.data_type() {
            Some(own) => own.is_comparable_with(data_type),
            None => true,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "'{v}'"),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
