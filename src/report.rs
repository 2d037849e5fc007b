//! Output artifacts: the complete analysis result, the summary document
//! persisted to object storage, and the metadata record keyed by file name.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    analysis::AnalysisError, quality::QualityReport, rows::Table, schema::Schema,
    stats::ColumnStatistics,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Success,
    Error,
}

impl AnalysisStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisStatus::Success)
    }
}

/// The complete output of one engine invocation. Constructed once per file,
/// immutable, handed to the persistence collaborators, then discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub file_name: String,
    pub row_count: usize,
    pub column_count: usize,
    pub schema: Schema,
    pub statistics: BTreeMap<String, ColumnStatistics>,
    pub quality_issues: QualityReport,
    pub status: AnalysisStatus,
    pub error_message: Option<String>,
}

impl Analysis {
    pub(crate) fn success(
        file_name: &str,
        table: &Table,
        schema: Schema,
        statistics: BTreeMap<String, ColumnStatistics>,
        quality_issues: QualityReport,
    ) -> Self {
        Self {
            file_name: file_name.to_string(),
            row_count: table.row_count(),
            column_count: table.column_count(),
            schema,
            statistics,
            quality_issues,
            status: AnalysisStatus::Success,
            error_message: None,
        }
    }

    pub(crate) fn failure(file_name: &str, error: &AnalysisError) -> Self {
        Self {
            file_name: file_name.to_string(),
            row_count: 0,
            column_count: 0,
            schema: Schema::default(),
            statistics: BTreeMap::new(),
            quality_issues: QualityReport::default(),
            status: AnalysisStatus::Error,
            error_message: Some(error.to_string()),
        }
    }
}

/// The JSON summary artifact written next to the processed file. Field
/// names and nesting are a stable external contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDocument {
    pub file_name: String,
    pub row_count: usize,
    pub column_count: usize,
    pub schema: Schema,
    pub statistics: BTreeMap<String, ColumnStatistics>,
    pub quality_issues: QualityReport,
}

impl SummaryDocument {
    pub fn from_analysis(analysis: &Analysis) -> Self {
        Self {
            file_name: analysis.file_name.clone(),
            row_count: analysis.row_count,
            column_count: analysis.column_count,
            schema: analysis.schema.clone(),
            statistics: analysis.statistics.clone(),
            quality_issues: analysis.quality_issues.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Serializing summary document")
    }
}

/// The structured record persisted per file name. Timestamps are supplied
/// by the caller; the engine itself never reads a clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub file_name: String,
    pub upload_timestamp: String,
    pub processed_timestamp: String,
    pub status: AnalysisStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub row_count: usize,
    pub column_count: usize,
    pub schema: Schema,
    pub statistics: BTreeMap<String, ColumnStatistics>,
    pub quality_issues: QualityReport,
}

impl MetadataRecord {
    pub fn from_analysis(
        analysis: &Analysis,
        upload_timestamp: String,
        processed_timestamp: String,
    ) -> Self {
        Self {
            file_name: analysis.file_name.clone(),
            upload_timestamp,
            processed_timestamp,
            status: analysis.status,
            error_message: analysis.error_message.clone(),
            row_count: analysis.row_count,
            column_count: analysis.column_count,
            schema: analysis.schema.clone(),
            statistics: analysis.statistics.clone(),
            quality_issues: analysis.quality_issues.clone(),
        }
    }
}
