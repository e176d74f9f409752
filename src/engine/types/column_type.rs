use std::cmp::Ordering;
use std::fmt::Debug;

use crate::engine::core::segment::{Segment, TypedSegment};

use super::{DataType, Value};

/// Borrowed comparison view of a value. Integers compare exactly, mixed
/// integer/float pairs compare by mathematical value, strings only with strings.
#[derive(Debug, Clone, Copy)]
pub enum Scalar<'a> {
    Int(i64),
    Float(f64),
    Str(&'a str),
}

impl PartialEq for Scalar<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Scalar<'_> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Int(a), Scalar::Int(b)) => Some(a.cmp(b)),
            (Scalar::Float(a), Scalar::Float(b)) => a.partial_cmp(b),
            (Scalar::Int(a), Scalar::Float(b)) => cmp_int_float(*a, *b),
            (Scalar::Float(a), Scalar::Int(b)) => cmp_int_float(*b, *a).map(Ordering::reverse),
            (Scalar::Str(a), Scalar::Str(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

fn cmp_int_float(int: i64, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    // 2^63 is exactly representable; everything at or above it exceeds any i64.
    if float >= 9_223_372_036_854_775_808.0 {
        return Some(Ordering::Less);
    }
    if float < -9_223_372_036_854_775_808.0 {
        return Some(Ordering::Greater);
    }
    let truncated = float.trunc();
    match int.cmp(&(truncated as i64)) {
        Ordering::Equal if float > truncated => Some(Ordering::Less),
        Ordering::Equal if float < truncated => Some(Ordering::Greater),
        other => Some(other),
    }
}

/// Rust type backing one logical column type.
///
/// The segment tag carries the logical type, so typed access to a [`Segment`]
/// is a plain match on the variant.
pub trait ColumnType: Clone + Default + PartialOrd + Debug + Send + Sync + 'static {
    const DATA_TYPE: DataType;

    fn into_value(self) -> Value;

    /// Converts a value of this or a narrower type of the same family.
    fn from_value(value: &Value) -> Option<Self>;

    fn scalar(&self) -> Scalar<'_>;

    /// Total order used for dictionaries and sorting.
    fn total_cmp(&self, other: &Self) -> Ordering;

    fn encode_bytes(&self, out: &mut Vec<u8>);

    fn decode_bytes(bytes: &[u8], pos: &mut usize) -> Option<Self>;

    /// Bytes owned outside of the value itself.
    fn heap_size(&self) -> usize {
        0
    }

    /// Distance from the block minimum, `None` when it does not fit 32 bits
    /// or the type has no frame-of-reference representation.
    fn frame_delta(&self, _minimum: &Self) -> Option<u32> {
        None
    }

    /// Inverse of [`frame_delta`](Self::frame_delta). Only integral types are
    /// ever frame-of-reference encoded.
    fn from_frame(minimum: &Self, _delta: u32) -> Self {
        minimum.clone()
    }

    fn typed_segment(segment: &Segment) -> Option<&TypedSegment<Self>>;

    fn typed_segment_mut(segment: &mut Segment) -> Option<&mut TypedSegment<Self>>;

    fn into_segment(segment: TypedSegment<Self>) -> Segment;
}

impl ColumnType for i32 {
    const DATA_TYPE: DataType = DataType::Int32;

    fn into_value(self) -> Value {
        Value::Int32(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    fn scalar(&self) -> Scalar<'_> {
        Scalar::Int(*self as i64)
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn encode_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn decode_bytes(bytes: &[u8], pos: &mut usize) -> Option<Self> {
        let raw = bytes.get(*pos..*pos + 4)?;
        *pos += 4;
        Some(i32::from_le_bytes(raw.try_into().ok()?))
    }

    #[inline]
    fn frame_delta(&self, minimum: &Self) -> Option<u32> {
        u32::try_from(*self as i64 - *minimum as i64).ok()
    }

    #[inline]
    fn from_frame(minimum: &Self, delta: u32) -> Self {
        minimum.wrapping_add(delta as i32)
    }

    fn typed_segment(segment: &Segment) -> Option<&TypedSegment<Self>> {
        match segment {
            Segment::Int32(typed) => Some(typed),
            _ => None,
        }
    }

    fn typed_segment_mut(segment: &mut Segment) -> Option<&mut TypedSegment<Self>> {
        match segment {
            Segment::Int32(typed) => Some(typed),
            _ => None,
        }
    }

    fn into_segment(segment: TypedSegment<Self>) -> Segment {
        Segment::Int32(segment)
    }
}

impl ColumnType for i64 {
    const DATA_TYPE: DataType = DataType::Int64;

    fn into_value(self) -> Value {
        Value::Int64(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int32(v) => Some(*v as i64),
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    fn scalar(&self) -> Scalar<'_> {
        Scalar::Int(*self)
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn encode_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn decode_bytes(bytes: &[u8], pos: &mut usize) -> Option<Self> {
        let raw = bytes.get(*pos..*pos + 8)?;
        *pos += 8;
        Some(i64::from_le_bytes(raw.try_into().ok()?))
    }

    #[inline]
    fn frame_delta(&self, minimum: &Self) -> Option<u32> {
        u32::try_from(*self as i128 - *minimum as i128).ok()
    }

    #[inline]
    fn from_frame(minimum: &Self, delta: u32) -> Self {
        minimum.wrapping_add(delta as i64)
    }

    fn typed_segment(segment: &Segment) -> Option<&TypedSegment<Self>> {
        match segment {
            Segment::Int64(typed) => Some(typed),
            _ => None,
        }
    }

    fn typed_segment_mut(segment: &mut Segment) -> Option<&mut TypedSegment<Self>> {
        match segment {
            Segment::Int64(typed) => Some(typed),
            _ => None,
        }
    }

    fn into_segment(segment: TypedSegment<Self>) -> Segment {
        Segment::Int64(segment)
    }
}

impl ColumnType for f32 {
    const DATA_TYPE: DataType = DataType::Float32;

    fn into_value(self) -> Value {
        Value::Float32(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float32(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    fn scalar(&self) -> Scalar<'_> {
        Scalar::Float(*self as f64)
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        f32::total_cmp(self, other)
    }

    fn encode_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn decode_bytes(bytes: &[u8], pos: &mut usize) -> Option<Self> {
        let raw = bytes.get(*pos..*pos + 4)?;
        *pos += 4;
        Some(f32::from_le_bytes(raw.try_into().ok()?))
    }

    fn typed_segment(segment: &Segment) -> Option<&TypedSegment<Self>> {
        match segment {
            Segment::Float32(typed) => Some(typed),
            _ => None,
        }
    }

    fn typed_segment_mut(segment: &mut Segment) -> Option<&mut TypedSegment<Self>> {
        match segment {
            Segment::Float32(typed) => Some(typed),
            _ => None,
        }
    }

    fn into_segment(segment: TypedSegment<Self>) -> Segment {
        Segment::Float32(segment)
    }
}

impl ColumnType for f64 {
    const DATA_TYPE: DataType = DataType::Float64;

    fn into_value(self) -> Value {
        Value::Float64(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float32(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    fn scalar(&self) -> Scalar<'_> {
        Scalar::Float(*self)
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        f64::total_cmp(self, other)
    }

    fn encode_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn decode_bytes(bytes: &[u8], pos: &mut usize) -> Option<Self> {
        let raw = bytes.get(*pos..*pos + 8)?;
        *pos += 8;
        Some(f64::from_le_bytes(raw.try_into().ok()?))
    }

    fn typed_segment(segment: &Segment) -> Option<&TypedSegment<Self>> {
        match segment {
            Segment::Float64(typed) => Some(typed),
            _ => None,
        }
    }

    fn typed_segment_mut(segment: &mut Segment) -> Option<&mut TypedSegment<Self>> {
        match segment {
            Segment::Float64(typed) => Some(typed),
            _ => None,
        }
    }

    fn into_segment(segment: TypedSegment<Self>) -> Segment {
        Segment::Float64(segment)
    }
}

impl ColumnType for String {
    const DATA_TYPE: DataType = DataType::String;

    fn into_value(self) -> Value {
        Value::String(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(v) => Some(v.clone()),
            _ => None,
        }
    }

    #[inline]
    fn scalar(&self) -> Scalar<'_> {
        Scalar::Str(self.as_str())
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn encode_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.len() as u32).to_le_bytes());
        out.extend_from_slice(self.as_bytes());
    }

    fn decode_bytes(bytes: &[u8], pos: &mut usize) -> Option<Self> {
        let raw_len = bytes.get(*pos..*pos + 4)?;
        let len = u32::from_le_bytes(raw_len.try_into().ok()?) as usize;
        let start = *pos + 4;
        let raw = bytes.get(start..start + len)?;
        *pos = start + len;
        String::from_utf8(raw.to_vec()).ok()
    }

    fn heap_size(&self) -> usize {
        self.capacity()
    }

    fn typed_segment(segment: &Segment) -> Option<&TypedSegment<Self>> {
        match segment {
            Segment::String(typed) => Some(typed),
            _ => None,
        }
    }

    fn typed_segment_mut(segment: &mut Segment) -> Option<&mut TypedSegment<Self>> {
        match segment {
            Segment::String(typed) => Some(typed),
            _ => None,
        }
    }

    fn into_segment(segment: TypedSegment<Self>) -> Segment {
        Segment::String(segment)
    }
}
