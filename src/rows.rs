//! The parsed row set an analysis operates on.
//!
//! A [`Table`] holds the header row plus every data row as raw string cells,
//! in file order. Rows are immutable once parsed and live only for the
//! duration of one analysis; they are not part of the output. Ragged rows
//! are kept as-is: a short row simply has no cell for its trailing columns,
//! and cells beyond the header count are ignored by every consumer.

use std::collections::HashSet;
use std::io::Read;

#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Reads the full record set. Duplicate header names are suffix-
    /// disambiguated deterministically (`name`, `name_2`, `name_3`, ...).
    pub fn from_reader<R: Read>(reader: &mut csv::Reader<R>) -> Result<Self, csv::Error> {
        let headers = reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let headers = disambiguate_headers(headers);
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Table { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

/// An empty or whitespace-only cell is missing; so is a cell absent from a
/// short row.
pub fn cell_is_missing(cell: Option<&str>) -> bool {
    cell.is_none_or(|value| value.trim().is_empty())
}

fn disambiguate_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut resolved = Vec::with_capacity(headers.len());
    for name in headers {
        let mut candidate = name.clone();
        let mut suffix = 2usize;
        while seen.contains(&candidate) {
            candidate = format!("{name}_{suffix}");
            suffix += 1;
        }
        seen.insert(candidate.clone());
        resolved.push(candidate);
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_headers_are_suffix_disambiguated() {
        let resolved = disambiguate_headers(vec![
            "id".to_string(),
            "name".to_string(),
            "name".to_string(),
            "name".to_string(),
        ]);
        assert_eq!(resolved, ["id", "name", "name_2", "name_3"]);
    }

    #[test]
    fn disambiguation_never_collides_with_existing_headers() {
        let resolved =
            disambiguate_headers(vec!["a".to_string(), "a_2".to_string(), "a".to_string()]);
        assert_eq!(resolved, ["a", "a_2", "a_3"]);
    }

    #[test]
    fn missing_covers_absent_empty_and_whitespace_cells() {
        assert!(cell_is_missing(None));
        assert!(cell_is_missing(Some("")));
        assert!(cell_is_missing(Some("   ")));
        assert!(!cell_is_missing(Some("0")));
    }
}
