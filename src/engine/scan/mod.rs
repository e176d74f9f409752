//! Predicate scans and row sampling producing position lists.
//!
//! Operand types and segment kinds are checked once per scan or chunk,
//! before any row is touched; the row loops never fail on a bad pairing.

mod cancellation;
mod column_vs_column;
mod column_vs_value;
mod index_scan;
mod output;
mod predicate;
mod sorted_search;
mod table_sample;
mod table_scan;

pub use cancellation::CancellationToken;
pub use column_vs_column::ColumnVsColumnScan;
pub use column_vs_value::ColumnVsValueScan;
pub use index_scan::IndexScan;
pub use predicate::{PredicateCondition, ScanPredicate};
pub use sorted_search::sorted_range_search;
pub use table_sample::TableSample;
pub use table_scan::TableScan;

pub(crate) use output::{build_reference_table, run_per_chunk};

#[cfg(test)]
mod sorted_search_test;
#[cfg(test)]
mod table_scan_test;
