//! Transactions and MVCC visibility.

mod context;
mod manager;
mod validate;

pub use context::TransactionContext;
pub use manager::{PendingWrite, TransactionManager};
pub use validate::{Validate, is_row_visible};
