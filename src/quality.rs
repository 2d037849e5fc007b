//! Missing- and invalid-value detection.
//!
//! Missing counts are computed for every column; invalid counts only for
//! columns inferred as integer or float, since a date column already
//! tolerated non-conforming values during detection and string columns
//! accept anything. A column appears in the report only when it actually
//! has an issue.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    data,
    rows::{self, Table},
    schema::{ColumnType, Schema},
};

const PERCENTAGE_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValueIssue {
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidValueIssue {
    pub count: usize,
    pub percentage: f64,
    pub expected_type: ColumnType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub total_rows: usize,
    pub has_issues: bool,
    pub missing_values: BTreeMap<String, MissingValueIssue>,
    pub invalid_values: BTreeMap<String, InvalidValueIssue>,
}

pub fn detect_quality_issues(table: &Table, schema: &Schema) -> QualityReport {
    let total_rows = table.row_count();
    let mut report = QualityReport {
        total_rows,
        ..QualityReport::default()
    };

    for (idx, column) in schema.columns.iter().enumerate() {
        let mut missing = 0usize;
        let mut invalid = 0usize;
        for row in table.rows() {
            let cell = row.get(idx).map(String::as_str);
            if rows::cell_is_missing(cell) {
                missing += 1;
                continue;
            }
            let value = cell.unwrap_or_default().trim();
            if column.datatype.is_numeric() && data::parse_number(value, column.datatype).is_none()
            {
                invalid += 1;
            }
        }
        if missing > 0 {
            report.missing_values.insert(
                column.name.clone(),
                MissingValueIssue {
                    count: missing,
                    percentage: percentage_of(missing, total_rows),
                },
            );
        }
        if invalid > 0 {
            report.invalid_values.insert(
                column.name.clone(),
                InvalidValueIssue {
                    count: invalid,
                    percentage: percentage_of(invalid, total_rows),
                    expected_type: column.datatype,
                },
            );
        }
    }

    report.has_issues = !report.missing_values.is_empty() || !report.invalid_values.is_empty();
    report
}

fn percentage_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    data::quantize(count as f64 / total as f64 * 100.0, PERCENTAGE_SCALE)
}
