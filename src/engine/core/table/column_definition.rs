use serde::Serialize;

use crate::engine::errors::TableError;
use crate::engine::types::{ColumnType, DataType, Value, resolve_data_type};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }

    /// Whether `value` may be stored in this column. Narrower numbers of the
    /// same family are accepted (an `int` into a `long` column).
    pub fn check(&self, value: &Value) -> Result<(), TableError> {
        if value.is_null() {
            return if self.nullable {
                Ok(())
            } else {
                Err(TableError::NullViolation {
                    column: self.name.clone(),
                })
            };
        }
        let fits = resolve_data_type!(self.data_type, T => T::from_value(value).is_some());
        if fits {
            Ok(())
        } else {
            Err(TableError::TypeMismatch {
                column: self.name.clone(),
                expected: self.data_type,
                value: value.clone(),
            })
        }
    }
}
