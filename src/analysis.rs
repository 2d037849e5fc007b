//! The analysis engine: decode, tokenize, infer, profile, assemble.
//!
//! [`analyze`] is total: every byte sequence yields an [`Analysis`]. Inputs
//! that cannot be decoded or tokenized at all are recovered into a
//! `status=error` result rather than an `Err`, so callers can persist one
//! uniform record shape regardless of outcome. Cell-level mismatches are
//! never errors; they land in the quality report.

use encoding_rs::UTF_8;
use log::{debug, warn};
use thiserror::Error;

use crate::{
    io_utils, quality,
    report::Analysis,
    rows::Table,
    schema, stats,
};

/// Ways an input can fail to reach the profiling stage. Always recovered
/// into a `status=error` result before leaving the engine.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to decode input as {encoding}")]
    Decode { encoding: &'static str },
    #[error("failed to tokenize input as CSV: {0}")]
    Tokenize(#[from] csv::Error),
    #[error("no columns defined in header row")]
    NoColumns,
}

/// Profiles one file held fully in memory, using the default comma
/// delimiter. Same bytes in, same result out.
pub fn analyze(file_name: &str, bytes: &[u8]) -> Analysis {
    analyze_with_delimiter(file_name, bytes, io_utils::DEFAULT_CSV_DELIMITER)
}

pub fn analyze_with_delimiter(file_name: &str, bytes: &[u8], delimiter: u8) -> Analysis {
    match run_analysis(file_name, bytes, delimiter) {
        Ok(analysis) => {
            debug!(
                "Analyzed '{file_name}': {} row(s), {} column(s)",
                analysis.row_count, analysis.column_count
            );
            analysis
        }
        Err(err) => {
            warn!("Analysis of '{file_name}' failed: {err}");
            Analysis::failure(file_name, &err)
        }
    }
}

fn run_analysis(file_name: &str, bytes: &[u8], delimiter: u8) -> Result<Analysis, AnalysisError> {
    let (text, encoding, had_errors) = UTF_8.decode(bytes);
    if had_errors {
        return Err(AnalysisError::Decode {
            encoding: encoding.name(),
        });
    }

    let mut reader = io_utils::open_csv_reader(text.as_bytes(), delimiter, true);
    let table = Table::from_reader(&mut reader)?;
    if table.column_count() == 0 {
        return Err(AnalysisError::NoColumns);
    }

    let schema = schema::infer_schema(&table);
    let statistics = stats::compute_statistics(&table, &schema);
    let quality_issues = quality::detect_quality_issues(&table, &schema);
    Ok(Analysis::success(
        file_name,
        &table,
        schema,
        statistics,
        quality_issues,
    ))
}
