mod column_type;
mod data_type;
mod ids;
mod order_by_mode;
mod value;

pub use column_type::{ColumnType, Scalar};
pub use data_type::DataType;
pub use ids::{
    ChunkId, ChunkOffset, ColumnId, CommitId, INVALID_TRANSACTION_ID, MAX_COMMIT_ID, RowId,
    TransactionId,
};
pub use order_by_mode::OrderByMode;
pub use value::Value;

/// Expands `$body` once per logical type, with `$t` bound to the concrete
/// Rust type backing `$data_type`.
macro_rules! resolve_data_type {
    ($data_type:expr, $t:ident => $body:expr) => {
        match $data_type {
            $crate::engine::types::DataType::Int32 => {
                type $t = i32;
                $body
            }
            $crate::engine::types::DataType::Int64 => {
                type $t = i64;
                $body
            }
            $crate::engine::types::DataType::Float32 => {
                type $t = f32;
                $body
            }
            $crate::engine::types::DataType::Float64 => {
                type $t = f64;
                $body
            }
            $crate::engine::types::DataType::String => {
                type $t = String;
                $body
            }
        }
    };
}

pub(crate) use resolve_data_type;

#[cfg(test)]
mod data_type_test;
#[cfg(test)]
mod value_test;
