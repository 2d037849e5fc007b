//! CSV reader construction and delimiter resolution.
//!
//! Readers are built `flexible` so ragged rows tokenize instead of erroring:
//! a short row's absent trailing cells count as missing downstream, and
//! extra cells beyond the header count are ignored. Delimiters resolve from
//! the file extension (`.tsv` means tab) unless overridden.

use std::{io::Read, path::Path};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8, has_headers: bool) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(has_headers)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn delimiter_resolves_from_extension_unless_overridden() {
        assert_eq!(
            resolve_input_delimiter(&PathBuf::from("drop.csv"), None),
            b','
        );
        assert_eq!(
            resolve_input_delimiter(&PathBuf::from("drop.TSV"), None),
            b'\t'
        );
        assert_eq!(
            resolve_input_delimiter(&PathBuf::from("drop.tsv"), Some(b';')),
            b';'
        );
    }

    #[test]
    fn flexible_reader_tolerates_ragged_rows() {
        let mut reader = open_csv_reader("a,b\n1,2,3\n4\n".as_bytes(), b',', true);
        let records: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].len(), 3);
        assert_eq!(records[1].len(), 1);
    }
}
