//! Secondary indexes attached to a chunk's segment set.

mod chunk_index;
mod group_key_index;

pub use chunk_index::{ChunkIndex, IndexKind};
pub use group_key_index::GroupKeyIndex;

#[cfg(test)]
mod group_key_index_test;
