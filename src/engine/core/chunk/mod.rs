#[allow(clippy::module_inception)]
mod chunk;
mod chunk_data;
mod mvcc_data;
mod position_list;

pub use chunk::Chunk;
pub use chunk_data::ChunkData;
pub use mvcc_data::{MvccData, RowVersion};
pub use position_list::PositionList;

#[cfg(test)]
mod mvcc_data_test;
