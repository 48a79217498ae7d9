pub mod error;
pub mod extraction;
pub mod model;
pub mod scan;
pub mod table;
pub mod writer;

use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use error::Result;
use extraction::FormReader;
use model::FileFailure;
use scan::{scan_directory, ScanOptions};
use table::{build_table, TableWarning};

/// Outcome of one run over a source directory.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub source: PathBuf,
    /// The summary file, when it was written.
    pub output: Option<PathBuf>,
    /// Why the summary file could not be written.
    pub write_error: Option<String>,
    pub rows: usize,
    pub columns: Vec<String>,
    pub failures: Vec<FileFailure>,
    pub warnings: Vec<TableWarning>,
}

impl RunSummary {
    pub fn succeeded(&self) -> bool {
        self.output.is_some()
    }

    /// Short title for the user: `Success` or `There was a problem`.
    pub fn title(&self) -> &'static str {
        if self.succeeded() {
            "Success"
        } else {
            "There was a problem"
        }
    }

    /// Human-readable message to go with [`RunSummary::title`].
    pub fn message(&self) -> String {
        match (&self.output, &self.write_error) {
            (Some(path), _) => format!("Summary file written to:\n    {}", path.display()),
            (None, Some(reason)) => reason.clone(),
            (None, None) => "Summary file was not written".to_string(),
        }
    }
}

/// Main API entry point: read every PDF form in `dir` and write the CSV
/// summary next to them.
///
/// Only problems with `dir` itself are returned as errors. Unreadable PDFs
/// end up in `failures`, and a failed write is reported through
/// `write_error`.
pub fn summarize_directory(
    dir: &Path,
    reader: &dyn FormReader,
    options: &ScanOptions,
    timestamp: NaiveDateTime,
) -> Result<RunSummary> {
    let scanned = scan_directory(dir, reader, options)?;
    let table = build_table(&scanned.files, &scanned.fields);

    info!(
        files = table.row_count(),
        columns = table.column_count(),
        failures = scanned.failures.len(),
        "built summary table"
    );

    let (output, write_error) = match writer::write_summary(dir, &table, timestamp) {
        Ok(path) => {
            info!("Summary file written to {}", path.display());
            (Some(path), None)
        }
        Err(e) => {
            tracing::error!("{e}");
            (None, Some(e.to_string()))
        }
    };

    Ok(RunSummary {
        source: dir.to_path_buf(),
        output,
        write_error,
        rows: table.row_count(),
        columns: table.header().into_iter().map(str::to_string).collect(),
        failures: scanned.failures,
        warnings: table.warnings().to_vec(),
    })
}
