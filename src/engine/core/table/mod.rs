mod column_definition;
mod segment_meta;
mod sort;
#[allow(clippy::module_inception)]
mod table;

pub use column_definition::ColumnDefinition;
pub use segment_meta::{SegmentMetaData, segment_meta_data};
pub use sort::sort_table_chunk_wise;
pub use table::{Table, TableType, UseMvcc};
