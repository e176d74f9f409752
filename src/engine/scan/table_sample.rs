use std::sync::Arc;

use tracing::{debug, info};

use super::build_reference_table;
use crate::engine::core::table::Table;
use crate::engine::errors::ScanError;
use crate::engine::types::{ChunkId, ChunkOffset};

/// Picks `num_rows` rows spread evenly over the input and outputs them as a
/// reference table. Inputs with fewer rows come back whole.
#[derive(Debug)]
pub struct TableSample {
    input: Arc<Table>,
    num_rows: usize,
}

impl TableSample {
    pub fn new(input: Arc<Table>, num_rows: usize) -> Self {
        Self { input, num_rows }
    }

    pub fn input(&self) -> &Arc<Table> {
        &self.input
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Sampled offsets per chunk, in table order. Row `i` of the sample is
    /// table row `i * total / wanted`.
    pub fn chunk_samples(&self) -> Vec<(ChunkId, Vec<ChunkOffset>)> {
        let sizes: Vec<u64> = self
            .input
            .chunks()
            .iter()
            .map(|chunk| chunk.size() as u64)
            .collect();
        let total: u64 = sizes.iter().sum();
        let wanted = (self.num_rows as u64).min(total);
        let mut picks = (0..wanted)
            .map(|i| (u128::from(i) * u128::from(total) / u128::from(wanted)) as u64)
            .peekable();

        let mut samples = Vec::with_capacity(sizes.len());
        let mut chunk_start = 0u64;
        for (chunk_id, size) in sizes.into_iter().enumerate() {
            let chunk_end = chunk_start + size;
            let mut offsets = Vec::new();
            while let Some(row) = picks.next_if(|&row| row < chunk_end) {
                offsets.push((row - chunk_start) as ChunkOffset);
            }
            samples.push((chunk_id as ChunkId, offsets));
            chunk_start = chunk_end;
        }
        samples
    }

    pub fn execute(&self) -> Result<Arc<Table>, ScanError> {
        let samples = self.chunk_samples();
        let sampled: usize = samples.iter().map(|(_, offsets)| offsets.len()).sum();
        debug!(
            target: "strata::scan",
            input_rows = self.input.row_count(),
            requested = self.num_rows,
            sampled,
            "Table sampled"
        );
        let output = build_reference_table(&self.input, samples).inspect_err(|e| e.log_error())?;
        info!(target: "strata::scan", description = %self.description(), sampled, "Sample executed");
        Ok(output)
    }

    pub fn description(&self) -> String {
        format!("TableSample {} row(s)", self.num_rows)
    }
}
