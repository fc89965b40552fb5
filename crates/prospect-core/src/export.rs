//! CSV export of filtered record sets.

use crate::error::{Error, Result};
use crate::record::Record;

/// Serialize records as CSV text: a header row taken from the first
/// record's field names, one row per record, every value quoted with
/// internal quotes doubled.
///
/// Returns [`Error::NoRecords`] when the set is empty so callers can
/// surface "nothing to export" instead of producing an empty file.
pub fn export_csv(records: &[&Record]) -> Result<String> {
    let first = records.first().ok_or(Error::NoRecords)?;
    let headers: Vec<String> = first.field_names().map(str::to_string).collect();

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(vec![]);

    writer.write_record(&headers)?;
    for record in records {
        let row: Vec<&str> = headers
            .iter()
            .map(|name| record.get(name).unwrap_or(""))
            .collect();
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Internal(format!("CSV writer flush failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| Error::Internal(format!("Export was not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_support::record;

    #[test]
    fn test_header_comes_from_first_record() {
        let a = record(&[("business_name", "Acme"), ("phone", "111")]);
        let b = record(&[("business_name", "Bolt"), ("phone", "222")]);
        let out = export_csv(&[&a, &b]).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("\"business_name\",\"phone\""));
        assert_eq!(lines.next(), Some("\"Acme\",\"111\""));
        assert_eq!(lines.next(), Some("\"Bolt\",\"222\""));
    }

    #[test]
    fn test_internal_quotes_are_doubled() {
        let a = record(&[("business_name", "Joe's \"Best\" Pizza")]);
        let out = export_csv(&[&a]).unwrap();
        assert!(out.contains("\"Joe's \"\"Best\"\" Pizza\""));
    }

    #[test]
    fn test_missing_fields_export_as_empty() {
        let a = record(&[("business_name", "Acme"), ("phone", "111")]);
        let b = record(&[("business_name", "Bolt")]);
        let out = export_csv(&[&a, &b]).unwrap();
        assert!(out.lines().nth(2).unwrap().ends_with(",\"\""));
    }

    #[test]
    fn test_empty_set_is_a_distinguished_error() {
        assert!(matches!(export_csv(&[]), Err(Error::NoRecords)));
    }
}
