pub mod core;
pub mod errors;
pub mod scan;
pub mod txn;
pub mod types;

pub use errors::*;
