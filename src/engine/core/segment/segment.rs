use super::{
    ChunkOffsetMapping, ColumnIter, EncodingType, ReferenceSegment, TypedSegment, ValueSegment,
};
use crate::engine::core::vector::VectorCompressionType;
use crate::engine::errors::{EncodingError, TableError};
use crate::engine::types::{ChunkOffset, ColumnType, DataType, Value, resolve_data_type};

/// One column of one chunk. The variant carries the logical type, so typed
/// access is a match instead of a downcast.
#[derive(Debug, Clone)]
pub enum Segment {
    Int32(TypedSegment<i32>),
    Int64(TypedSegment<i64>),
    Float32(TypedSegment<f32>),
    Float64(TypedSegment<f64>),
    String(TypedSegment<String>),
    Reference(ReferenceSegment),
}

impl<T: ColumnType> From<TypedSegment<T>> for Segment {
    fn from(segment: TypedSegment<T>) -> Self {
        T::into_segment(segment)
    }
}

impl Segment {
    /// Empty appendable segment for a column of `data_type`.
    pub fn new_value_segment(data_type: DataType, nullable: bool) -> Self {
        resolve_data_type!(data_type, T => {
            Segment::from(TypedSegment::Value(ValueSegment::<T>::new(nullable)))
        })
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Segment::Int32(_) => DataType::Int32,
            Segment::Int64(_) => DataType::Int64,
            Segment::Float32(_) => DataType::Float32,
            Segment::Float64(_) => DataType::Float64,
            Segment::String(_) => DataType::String,
            Segment::Reference(r) => r.data_type(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Segment::Int32(s) => s.len(),
            Segment::Int64(s) => s.len(),
            Segment::Float32(s) => s.len(),
            Segment::Float64(s) => s.len(),
            Segment::String(s) => s.len(),
            Segment::Reference(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Segment::Reference(_))
    }

    /// Short name used in diagnostics: "reference" or "data".
    pub fn kind(&self) -> &'static str {
        if self.is_reference() {
            "reference"
        } else {
            "data"
        }
    }

    pub fn as_reference(&self) -> Option<&ReferenceSegment> {
        match self {
            Segment::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// Physical encoding, `None` for reference segments.
    pub fn encoding_type(&self) -> Option<EncodingType> {
        match self {
            Segment::Int32(s) => Some(s.encoding_type()),
            Segment::Int64(s) => Some(s.encoding_type()),
            Segment::Float32(s) => Some(s.encoding_type()),
            Segment::Float64(s) => Some(s.encoding_type()),
            Segment::String(s) => Some(s.encoding_type()),
            Segment::Reference(_) => None,
        }
    }

    pub fn vector_compression(&self) -> Option<VectorCompressionType> {
        match self {
            Segment::Int32(s) => s.vector_compression(),
            Segment::Int64(s) => s.vector_compression(),
            Segment::Float32(s) => s.vector_compression(),
            Segment::Float64(s) => s.vector_compression(),
            Segment::String(s) => s.vector_compression(),
            Segment::Reference(_) => None,
        }
    }

    pub fn estimate_memory_usage(&self) -> usize {
        match self {
            Segment::Int32(s) => s.estimate_memory_usage(),
            Segment::Int64(s) => s.estimate_memory_usage(),
            Segment::Float32(s) => s.estimate_memory_usage(),
            Segment::Float64(s) => s.estimate_memory_usage(),
            Segment::String(s) => s.estimate_memory_usage(),
            Segment::Reference(r) => r.estimate_memory_usage(),
        }
    }

    /// Typed view of a data segment.
    pub fn typed<T: ColumnType>(&self) -> Result<&TypedSegment<T>, EncodingError> {
        match self {
            Segment::Reference(_) => Err(EncodingError::ReferenceSegment),
            _ => T::typed_segment(self).ok_or(EncodingError::TypeMismatch {
                requested: T::DATA_TYPE,
                actual: self.data_type(),
            }),
        }
    }

    /// Sequential iteration as `T`. Reference segments yield offsets into
    /// their position list.
    pub fn iter<T: ColumnType>(&self) -> Result<ColumnIter<'_, T>, EncodingError> {
        match self {
            Segment::Reference(r) => {
                self.check_type::<T>()?;
                Ok(ColumnIter::Resolved(r.materialize::<T>()?.into_iter()))
            }
            _ => Ok(ColumnIter::Sequential(self.typed::<T>()?.iter()?)),
        }
    }

    /// Position-filtered iteration as `T`, in mapping order.
    pub fn point_iter<T: ColumnType>(
        &self,
        mappings: Vec<ChunkOffsetMapping>,
    ) -> Result<ColumnIter<'_, T>, EncodingError> {
        match self {
            Segment::Reference(r) => {
                self.check_type::<T>()?;
                let positions = r.positions();
                let mut requests = Vec::with_capacity(mappings.len());
                for mapping in &mappings {
                    let row = positions
                        .get(mapping.offset_in_referenced_chunk as usize)
                        .ok_or_else(|| {
                            EncodingError::Corrupted(format!(
                                "offset {} beyond position list of {}",
                                mapping.offset_in_referenced_chunk,
                                positions.len()
                            ))
                        })?;
                    requests.push((mapping.offset_in_poslist, row));
                }
                Ok(ColumnIter::Resolved(r.resolve::<T>(requests)?.into_iter()))
            }
            _ => {
                let typed = self.typed::<T>()?;
                if let Some(bad) = mappings
                    .iter()
                    .find(|m| m.offset_in_referenced_chunk as usize >= typed.len())
                {
                    return Err(EncodingError::Corrupted(format!(
                        "offset {} beyond segment of {} rows",
                        bad.offset_in_referenced_chunk,
                        typed.len()
                    )));
                }
                Ok(ColumnIter::Point(typed.point_iter(mappings)?))
            }
        }
    }

    /// Value at `offset` as an all-type [`Value`].
    pub fn value_at(&self, offset: ChunkOffset) -> Result<Value, EncodingError> {
        resolve_data_type!(self.data_type(), T => {
            let value: Option<T> = match self {
                Segment::Reference(r) => {
                    let row = r.positions().get(offset as usize).ok_or_else(|| {
                        EncodingError::Corrupted(format!("offset {offset} beyond position list"))
                    })?;
                    r.resolve::<T>([(offset, row)])?
                        .pop()
                        .and_then(|(_, value)| value)
                }
                _ => {
                    let typed = self.typed::<T>()?;
                    if offset as usize >= typed.len() {
                        return Err(EncodingError::Corrupted(format!(
                            "offset {offset} beyond segment of {} rows",
                            typed.len()
                        )));
                    }
                    typed.value_at(offset as usize)?
                }
            };
            Ok(value.map_or(Value::Null, T::into_value))
        })
    }

    /// Every row as a [`Value`], in iteration order.
    pub fn values(&self) -> Result<Vec<Value>, EncodingError> {
        resolve_data_type!(self.data_type(), T => {
            Ok(self
                .iter::<T>()?
                .map(|position| position.into_option().map_or(Value::Null, T::into_value))
                .collect())
        })
    }

    /// Appends one row to an unencoded segment.
    pub fn append(&mut self, value: &Value, column: &str) -> Result<(), TableError> {
        resolve_data_type!(self.data_type(), T => append_typed::<T>(self, value, column))
    }

    fn check_type<T: ColumnType>(&self) -> Result<(), EncodingError> {
        if self.data_type() == T::DATA_TYPE {
            Ok(())
        } else {
            Err(EncodingError::TypeMismatch {
                requested: T::DATA_TYPE,
                actual: self.data_type(),
            })
        }
    }
}

fn append_typed<T: ColumnType>(
    segment: &mut Segment,
    value: &Value,
    column: &str,
) -> Result<(), TableError> {
    let Some(TypedSegment::Value(values)) = T::typed_segment_mut(segment) else {
        return Err(TableError::ChunkImmutable);
    };
    if value.is_null() {
        values.push(None);
        return Ok(());
    }
    let typed = T::from_value(value).ok_or_else(|| TableError::TypeMismatch {
        column: column.to_string(),
        expected: T::DATA_TYPE,
        value: value.clone(),
    })?;
    values.push(Some(typed));
    Ok(())
}
