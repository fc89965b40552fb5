//! Incremental CSV reading.

use crate::error::Result;
use std::path::Path;
use tracing::warn;

/// Result of one incremental read pass over a CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvBatch {
    /// Header row field names.
    pub headers: Vec<String>,
    /// Rows at index >= the requested cursor, as field name/value pairs
    /// in column order.
    pub new_rows: Vec<Vec<(String, String)>>,
    /// Total well-formed row count of the file.
    pub total_rows: usize,
    /// Rows dropped for being malformed.
    pub skipped: usize,
}

/// Parse a CSV file and return the rows at index >= `from_row` plus the
/// file's total row count.
///
/// The file is treated as UTF-8 with RFC4180 quoting. Malformed rows
/// (wrong column count, unparsable) are logged and skipped without
/// aborting the file; they do not count toward row indices, so the
/// cursor arithmetic stays deterministic across re-reads. Empty and
/// header-only files yield zero rows, not an error.
pub fn read_rows(path: &Path, from_row: usize) -> Result<CsvBatch> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect();

    let mut new_rows = Vec::new();
    let mut total_rows = 0usize;
    let mut skipped = 0usize;

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Skipping malformed CSV row");
                skipped += 1;
                continue;
            }
        };

        if record.len() != headers.len() {
            warn!(
                file = %path.display(),
                expected = headers.len(),
                got = record.len(),
                "Skipping row with wrong column count"
            );
            skipped += 1;
            continue;
        }

        if total_rows >= from_row {
            let row = headers
                .iter()
                .zip(record.iter())
                .map(|(name, value)| (name.clone(), value.to_string()))
                .collect();
            new_rows.push(row);
        }
        total_rows += 1;
    }

    Ok(CsvBatch {
        headers,
        new_rows,
        total_rows,
        skipped,
    })
}
