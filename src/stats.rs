//! Summary statistics for numeric columns.
//!
//! Only cells that are non-missing and parse under the column's inferred
//! type contribute; missing and invalid cells are excluded from the
//! computation, never treated as zero. A numeric column with zero valid
//! values produces no entry at all.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    data::{self, Number},
    rows::Table,
    schema::Schema,
};

/// Averages are quantized to four decimal places at the persistence
/// boundary; min/max keep the parsed values exactly.
const AVG_SCALE: u32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub min: Number,
    pub max: Number,
    pub avg: f64,
    pub count: usize,
}

pub fn compute_statistics(table: &Table, schema: &Schema) -> BTreeMap<String, ColumnStatistics> {
    let mut statistics = BTreeMap::new();
    for (idx, column) in schema.columns.iter().enumerate() {
        if !column.datatype.is_numeric() {
            continue;
        }
        let mut accumulator = ColumnAccumulator::new();
        for row in table.rows() {
            let Some(value) = row.get(idx) else {
                continue;
            };
            let trimmed = value.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(number) = data::parse_number(trimmed, column.datatype) {
                accumulator.record(number);
            }
        }
        if let Some(stats) = accumulator.finalize() {
            statistics.insert(column.name.clone(), stats);
        }
    }
    statistics
}

#[derive(Debug, Default)]
struct ColumnAccumulator {
    count: usize,
    sum: f64,
    min: Option<Number>,
    max: Option<Number>,
}

impl ColumnAccumulator {
    fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, value: Number) {
        self.count += 1;
        self.sum += value.as_f64();
        self.min = Some(match self.min {
            Some(current) => current.min(value),
            None => value,
        });
        self.max = Some(match self.max {
            Some(current) => current.max(value),
            None => value,
        });
    }

    fn finalize(self) -> Option<ColumnStatistics> {
        let (min, max) = (self.min?, self.max?);
        Some(ColumnStatistics {
            min,
            max,
            avg: data::quantize(self.sum / self.count as f64, AVG_SCALE),
            count: self.count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulator_tracks_extrema_and_mean() {
        let mut accumulator = ColumnAccumulator::new();
        for value in [1.0, 2.5, 3.0] {
            accumulator.record(Number::Float(value));
        }
        let stats = accumulator.finalize().unwrap();
        assert_eq!(stats.min, Number::Float(1.0));
        assert_eq!(stats.max, Number::Float(3.0));
        assert_eq!(stats.avg, 2.1667);
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn empty_accumulator_finalizes_to_none() {
        assert!(ColumnAccumulator::new().finalize().is_none());
    }

    #[test]
    fn integer_extrema_stay_integers() {
        let mut accumulator = ColumnAccumulator::new();
        accumulator.record(Number::Integer(30));
        let stats = accumulator.finalize().unwrap();
        assert_eq!(stats.min, Number::Integer(30));
        assert_eq!(stats.max, Number::Integer(30));
        assert_eq!(stats.avg, 30.0);
        assert_eq!(stats.count, 1);
    }
}
