use std::sync::Arc;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strata_db::engine::core::segment::{ChunkEncoder, EncodingType, SegmentEncodingSpec};
use strata_db::engine::core::table::{
    ColumnDefinition, Table, TableType, UseMvcc, segment_meta_data, sort_table_chunk_wise,
};
use strata_db::engine::scan::{PredicateCondition, ScanPredicate, TableSample, TableScan};
use strata_db::engine::txn::{TransactionManager, Validate};
use strata_db::engine::types::{DataType, OrderByMode, RowId, Value};
use strata_db::logging;
use tracing::info;

#[derive(Parser)]
#[command(name = "strata-db")]
#[command(about = "Loads a random table and runs scans and validation over it", long_about = None)]
struct Args {
    /// Number of rows to generate
    #[arg(short, long, default_value = "100000")]
    rows: usize,

    /// Rows per chunk
    #[arg(short, long, default_value = "10000")]
    chunk_size: usize,

    /// Seed for the row generator
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Encoding applied to every column (Unencoded, Dictionary, RunLength,
    /// FrameOfReference, LZ4)
    #[arg(short, long, default_value = "Dictionary")]
    encoding: EncodingType,

    /// Literal for the `a < literal` scan
    #[arg(long, default_value = "250")]
    below: i32,
}

fn load_table(args: &Args) -> anyhow::Result<Arc<Table>> {
    let table = Arc::new(Table::new(
        vec![
            ColumnDefinition::new("a", DataType::Int32, true),
            ColumnDefinition::new("b", DataType::Int32, false),
            ColumnDefinition::new("c", DataType::String, false),
        ],
        TableType::Data,
        Some(args.chunk_size),
        UseMvcc::Yes,
    ));

    let mut rng = StdRng::seed_from_u64(args.seed);
    for _ in 0..args.rows {
        let a = if rng.gen_bool(0.05) {
            Value::Null
        } else {
            Value::Int32(rng.gen_range(0..1000))
        };
        let b = Value::Int32(rng.gen_range(0..1000));
        let c = Value::from(format!("k{}", rng.gen_range(0..50)));
        table.append(&[a, b, c])?;
    }
    table.finalize_last_chunk();
    Ok(table)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _logging = logging::init()?;

    let table = load_table(&args)?;
    info!(rows = table.row_count(), chunks = table.chunk_count(), "Table loaded");

    // The string column cannot take frame-of-reference, so it falls back
    // to a dictionary.
    let spec = SegmentEncodingSpec::new(args.encoding);
    let mut specs = vec![spec; table.column_count()];
    if !spec.encoding_type.supports(DataType::String) {
        specs[2] = SegmentEncodingSpec::new(EncodingType::Dictionary);
    }

    let sorted = sort_table_chunk_wise(&table, 0, args.chunk_size, None, OrderByMode::Ascending)?;
    ChunkEncoder::encode_all_chunks(&sorted, &specs)?;

    let below = TableScan::new(
        Arc::clone(&sorted),
        ScanPredicate::column_vs_value(0, PredicateCondition::LessThan, args.below),
    )?;
    let below_rows = below.execute()?.row_count();
    println!("{}: {} row(s)", below.description(), below_rows);

    ChunkEncoder::encode_all_chunks(&table, &specs)?;

    let a_below_b = TableScan::new(
        Arc::clone(&table),
        ScanPredicate::column_vs_column(0, PredicateCondition::LessThan, 1),
    )?;
    let a_below_b_rows = a_below_b.execute()?.row_count();
    println!("{}: {} row(s)", a_below_b.description(), a_below_b_rows);

    let sample = TableSample::new(Arc::clone(&table), 10);
    let sampled_rows = sample.execute()?.row_count();
    println!("{}: {} row(s)", sample.description(), sampled_rows);

    let manager = TransactionManager::new();
    let writer = manager.begin();
    let mut writes = Vec::new();
    if !table.is_empty() {
        writes.push(manager.delete(&writer, &table, RowId::new(0, 0))?);
    }
    writes.push(manager.insert(
        &writer,
        &table,
        &[Value::Int32(1), Value::Int32(2), Value::from("new")],
    )?);

    let before_commit = manager.begin();
    let commit_id = manager.commit(&writer, &writes)?;
    let after_commit = manager.begin();

    let seen_before = Validate::new(Arc::clone(&table), before_commit)
        .execute()?
        .row_count();
    let seen_after = Validate::new(Arc::clone(&table), after_commit)
        .execute()?
        .row_count();
    println!(
        "commit {commit_id}: {seen_before} row(s) visible before, {seen_after} after"
    );

    let meta: Vec<_> = segment_meta_data(&sorted)
        .into_iter()
        .filter(|m| m.chunk_id == 0)
        .collect();
    println!("{}", serde_json::to_string_pretty(&meta)?);

    Ok(())
}
