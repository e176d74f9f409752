use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::types::{DataType, Value};

/// Deterministic random cells for comparing scans against a naive filter.
pub struct ValueFactory {
    rng: StdRng,
    null_ratio: f64,
    max_int: i32,
}

impl ValueFactory {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            null_ratio: 0.0,
            max_int: 100,
        }
    }

    pub fn with_null_ratio(mut self, ratio: f64) -> Self {
        self.null_ratio = ratio;
        self
    }

    /// Integers are drawn from `0..max`; small ranges give many duplicates.
    pub fn with_max_int(mut self, max: i32) -> Self {
        self.max_int = max.max(1);
        self
    }

    pub fn next_value(&mut self, data_type: DataType, nullable: bool) -> Value {
        if nullable && self.null_ratio > 0.0 && self.rng.gen_bool(self.null_ratio) {
            return Value::Null;
        }
        let n = self.rng.gen_range(0..self.max_int);
        match data_type {
            DataType::Int32 => Value::Int32(n),
            DataType::Int64 => Value::Int64(n as i64 - (self.max_int / 2) as i64),
            DataType::Float32 => Value::Float32(n as f32 / 4.0),
            DataType::Float64 => Value::Float64(n as f64 / 8.0),
            DataType::String => Value::String(format!("v{n:04}")),
        }
    }

    pub fn rows(&mut self, columns: &[(DataType, bool)], count: usize) -> Vec<Vec<Value>> {
        (0..count)
            .map(|_| {
                columns
                    .iter()
                    .map(|&(data_type, nullable)| self.next_value(data_type, nullable))
                    .collect()
            })
            .collect()
    }
}
