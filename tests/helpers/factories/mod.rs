pub mod segment_factory;
pub mod table_factory;
pub mod value_factory;

pub use segment_factory::SegmentFactory;
pub use table_factory::TableFactory;
pub use value_factory::ValueFactory;
