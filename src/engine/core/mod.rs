pub mod chunk;
pub mod column;
pub mod index;
pub mod segment;
pub mod table;
pub mod vector;

pub use chunk::{Chunk, ChunkData, MvccData, PositionList, RowVersion};
pub use segment::{EncodingType, Segment, SegmentEncodingSpec};
pub use table::{ColumnDefinition, Table, TableType, UseMvcc};
pub use vector::VectorCompressionType;
