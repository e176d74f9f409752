use std::sync::Arc;

use crate::engine::core::segment::{EncodingType, SegmentEncodingSpec};
use crate::engine::core::table::{Table, TableType, sort_table_chunk_wise};
use crate::engine::errors::ScanError;
use crate::engine::scan::{CancellationToken, PredicateCondition, ScanPredicate, TableScan};
use crate::engine::types::{DataType, OrderByMode, RowId, Value};
use crate::logging::init_for_tests;
use crate::test_helpers::factory::Factory;

fn random_table(rows: usize, chunk_size: usize) -> (Arc<Table>, Vec<Vec<Value>>) {
    let mut values = Factory::values(21).with_null_ratio(0.1).with_max_int(50);
    let factory = Factory::table()
        .with_column("a", DataType::Int32, true)
        .with_column("b", DataType::Int32, false)
        .with_column("c", DataType::String, false)
        .with_chunk_size(chunk_size)
        .with_random_rows(rows, &mut values);
    let expected = factory.rows().to_vec();
    (factory.create(), expected)
}

fn filter(
    rows: &[Vec<Value>],
    column: usize,
    condition: PredicateCondition,
    literal: &Value,
) -> Vec<Vec<Value>> {
    rows.iter()
        .filter(|row| condition.evaluate(row[column].compare(literal)))
        .cloned()
        .collect()
}

fn sorted_rows(rows: Vec<Vec<Value>>) -> Vec<String> {
    let mut keys: Vec<String> = rows.into_iter().map(|row| format!("{row:?}")).collect();
    keys.sort();
    keys
}

#[test]
fn scan_outputs_a_reference_table_of_the_matching_rows() {
    init_for_tests();
    let (table, rows) = random_table(50, 8);
    let scan = TableScan::new(
        Arc::clone(&table),
        ScanPredicate::column_vs_value(0, PredicateCondition::LessThan, 20),
    )
    .expect("scan");
    let output = scan.execute().expect("execute");

    assert_eq!(output.table_type(), TableType::References);
    assert!(!output.uses_mvcc());
    assert_eq!(output.column_definitions(), table.column_definitions());
    assert_eq!(
        output.get_rows().expect("rows"),
        filter(&rows, 0, PredicateCondition::LessThan, &Value::Int32(20))
    );

    for chunk in output.chunks() {
        let data = chunk.snapshot();
        let first = data.segment(0).and_then(|s| s.as_reference()).expect("reference");
        assert!(Arc::ptr_eq(first.referenced_table(), &table));
        for segment in data.segments() {
            let reference = segment.as_reference().expect("reference");
            assert!(Arc::ptr_eq(reference.positions(), first.positions()));
        }
    }
}

#[test]
fn chunk_positions_are_reported_per_input_chunk() {
    let table = Factory::table()
        .with_column("a", DataType::Int32, false)
        .with_chunk_size(3)
        .with_rows((0..7).map(|n| vec![Value::Int32(n)]).collect())
        .create();
    let scan = TableScan::new(
        Arc::clone(&table),
        ScanPredicate::column_vs_value(0, PredicateCondition::GreaterThanEquals, 5),
    )
    .expect("scan");

    let positions = scan.matching_positions().expect("positions");
    assert_eq!(positions.len(), 3);
    assert!(positions[0].is_empty());
    assert_eq!(positions[1].as_slice(), &[RowId::new(1, 2)]);
    assert_eq!(positions[2].as_slice(), &[RowId::new(2, 0)]);
    assert_eq!(scan.scan_chunk(1).expect("chunk 1"), positions[1]);
    assert!(matches!(scan.scan_chunk(3).unwrap_err(), ScanError::ChunkOutOfRange(3)));

    // Chunks without matches leave no output chunk.
    assert_eq!(scan.execute().expect("execute").chunk_count(), 2);
}

#[test]
fn scans_chain_over_reference_tables() {
    let (table, rows) = random_table(60, 7);
    let first = TableScan::new(
        Arc::clone(&table),
        ScanPredicate::column_vs_value(1, PredicateCondition::GreaterThan, 10),
    )
    .expect("scan")
    .execute()
    .expect("first");
    let second = TableScan::new(
        Arc::clone(&first),
        ScanPredicate::column_vs_column(0, PredicateCondition::LessThan, 1),
    )
    .expect("scan")
    .execute()
    .expect("second");

    let expected: Vec<Vec<Value>> =
        filter(&rows, 1, PredicateCondition::GreaterThan, &Value::Int32(10))
            .into_iter()
            .filter(|row| PredicateCondition::LessThan.evaluate(row[0].compare(&row[1])))
            .collect();
    assert_eq!(second.get_rows().expect("rows"), expected);

    // The chained output points at the data table, never at `first`.
    for chunk in second.chunks() {
        for segment in chunk.snapshot().segments() {
            let reference = segment.as_reference().expect("reference");
            assert!(Arc::ptr_eq(reference.referenced_table(), &table));
        }
    }
}

#[test]
fn sorted_chunks_are_binary_searched() {
    init_for_tests();
    let (table, rows) = random_table(40, 10);
    let sorted = sort_table_chunk_wise(
        &table,
        0,
        10,
        Some(SegmentEncodingSpec::new(EncodingType::Dictionary)),
        OrderByMode::DescendingNullsLast,
    )
    .expect("sort");

    for condition in PredicateCondition::ALL {
        let scan = TableScan::new(
            Arc::clone(&sorted),
            ScanPredicate::column_vs_value(0, condition, 25),
        )
        .expect("scan");
        assert_eq!(scan.description(), format!("TableScan #0 {} 25", condition.symbol()));
        let output = scan.execute().expect("execute");
        assert_eq!(
            sorted_rows(output.get_rows().expect("rows")),
            sorted_rows(filter(&rows, 0, condition, &Value::Int32(25))),
            "{condition}"
        );
        assert!(
            scan.description()
                .ends_with(" (binary search on 4 sorted chunk(s))"),
            "{}",
            scan.description()
        );
    }

    let unsorted_column = TableScan::new(
        Arc::clone(&sorted),
        ScanPredicate::column_vs_value(1, PredicateCondition::Equals, 3),
    )
    .expect("scan");
    unsorted_column.execute().expect("execute");
    assert!(!unsorted_column.description().contains("binary search"));
}

#[test]
fn parallel_and_sequential_scans_agree() {
    let (table, _) = random_table(200, 9);
    let predicate = ScanPredicate::column_vs_value(2, PredicateCondition::LessThanEquals, "v0025");
    let parallel = TableScan::new(Arc::clone(&table), predicate.clone())
        .expect("scan")
        .with_parallel_threshold(1)
        .execute()
        .expect("parallel");
    let sequential = TableScan::new(Arc::clone(&table), predicate)
        .expect("scan")
        .with_parallel_threshold(usize::MAX)
        .execute()
        .expect("sequential");
    assert_eq!(
        parallel.get_rows().expect("rows"),
        sequential.get_rows().expect("rows")
    );
    assert!(parallel.row_count() > 0);
}

#[test]
fn repeated_scans_give_identical_positions() {
    let (table, _) = random_table(45, 6);
    let scan = TableScan::new(
        table,
        ScanPredicate::column_vs_column(0, PredicateCondition::GreaterThanEquals, 1),
    )
    .expect("scan")
    .with_parallel_threshold(2);
    let first = scan.matching_positions().expect("first");
    let second = scan.matching_positions().expect("second");
    assert_eq!(first, second);
}

#[test]
fn cancelled_scan_returns_an_error() {
    let (table, _) = random_table(30, 5);
    let token = CancellationToken::new();
    let scan = TableScan::new(
        table,
        ScanPredicate::column_vs_value(0, PredicateCondition::Equals, 1),
    )
    .expect("scan")
    .with_cancellation(token.clone());
    token.cancel();
    assert!(token.is_cancelled());
    assert!(matches!(scan.execute().unwrap_err(), ScanError::Cancelled));
}

#[test]
fn empty_tables_scan_to_empty_outputs() {
    let table = Factory::table()
        .with_column("a", DataType::Int32, true)
        .create();
    let output = TableScan::new(
        table,
        ScanPredicate::column_vs_value(0, PredicateCondition::NotEquals, 0),
    )
    .expect("scan")
    .execute()
    .expect("execute");
    assert!(output.is_empty());
    assert_eq!(output.chunk_count(), 0);
}

#[test]
fn predicates_are_checked_against_the_schema() {
    let (table, _) = random_table(4, 4);
    let err = TableScan::new(
        Arc::clone(&table),
        ScanPredicate::column_vs_column(0, PredicateCondition::Equals, 2),
    )
    .unwrap_err();
    assert!(matches!(err, ScanError::IncompatibleTypes { .. }));

    let err = TableScan::new(
        table,
        ScanPredicate::column_vs_value(2, PredicateCondition::Equals, 2.5),
    )
    .unwrap_err();
    assert!(matches!(err, ScanError::IncompatibleLiteral { column_id: 2, .. }));
}
