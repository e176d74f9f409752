pub use super::factories::{SegmentFactory, TableFactory, ValueFactory};

pub struct Factory;

impl Factory {
    pub fn table() -> TableFactory {
        TableFactory::new()
    }

    pub fn mvcc_table() -> TableFactory {
        TableFactory::new().with_mvcc()
    }

    pub fn segment() -> SegmentFactory {
        SegmentFactory::new()
    }

    pub fn values(seed: u64) -> ValueFactory {
        ValueFactory::seeded(seed)
    }
}
