use chrono::NaiveDateTime;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{PdfFormError, Result};
use crate::table::FieldTable;

/// Prefix of every summary file name.
pub const SUMMARY_PREFIX: &str = "pdfSummary-";

/// `pdfSummary-20240131T154502.csv`: sortable, filesystem-safe, second resolution.
pub fn summary_file_name(timestamp: NaiveDateTime) -> String {
    format!("{SUMMARY_PREFIX}{}.csv", timestamp.format("%Y%m%dT%H%M%S"))
}

/// Write the header and one record per row as comma-separated values.
pub fn write_table<W: Write>(out: W, table: &FieldTable) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(out);
    writer.write_record(table.header())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `table` to a new timestamped summary file inside `dir`.
pub fn write_summary(dir: &Path, table: &FieldTable, timestamp: NaiveDateTime) -> Result<PathBuf> {
    let path = dir.join(summary_file_name(timestamp));
    let write_err = |source| PdfFormError::Write {
        path: path.clone(),
        source,
    };

    let file = File::create(&path).map_err(write_err)?;
    match write_table(file, table) {
        Ok(()) => Ok(path),
        Err(PdfFormError::Io(e)) => Err(write_err(e)),
        Err(PdfFormError::Csv(e)) => Err(write_err(e.into())),
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldEntry;
    use crate::table::TableBuilder;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(15, 45, 2)
            .unwrap()
    }

    #[test]
    fn test_summary_file_name() {
        assert_eq!(
            summary_file_name(timestamp()),
            "pdfSummary-20240131T154502.csv"
        );
    }

    #[test]
    fn test_write_table_quotes_where_needed() {
        let mut builder = TableBuilder::new();
        builder.push_file(
            "a.pdf",
            &[
                FieldEntry::new("Address", "1 Main St, Springfield"),
                FieldEntry::new("Quote", "she said \"hi\""),
                FieldEntry::new("Notes", "line one\nline two"),
            ],
        );
        builder.push_file("b.pdf", &[FieldEntry::new("Plain", "x")]);
        let table = builder.finish();

        let mut out = Vec::new();
        write_table(&mut out, &table).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "filename,Address,Quote,Notes,Plain\n\
             a.pdf,\"1 Main St, Springfield\",\"she said \"\"hi\"\"\",\"line one\nline two\",\n\
             b.pdf,,,,x\n"
        );
    }

    #[test]
    fn test_write_summary_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let table = TableBuilder::new().finish();
        let err = write_summary(&missing, &table, timestamp()).unwrap_err();
        assert!(matches!(err, PdfFormError::Write { .. }));
        assert!(err
            .to_string()
            .starts_with("Cannot write summary file to "));
    }
}
