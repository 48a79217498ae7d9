use chrono::Local;
use pdfform_core::error::PdfFormError;
use pdfform_core::extraction::lopdf_form::LopdfFormReader;
use pdfform_core::scan::ScanOptions;
use std::path::PathBuf;
use tracing::{error, info};

use crate::dialog;
use crate::output;

pub fn run(
    directory: Option<PathBuf>,
    output_format: &str,
    options: ScanOptions,
) -> Result<(), PdfFormError> {
    // No directory argument means an interactive session.
    let interactive = directory.is_none();
    let source = match directory {
        Some(dir) => dir,
        None => match dialog::pick_directory()? {
            Some(dir) => dir,
            None => return Ok(()),
        },
    };
    info!("Summarizing {}", source.display());

    let reader = LopdfFormReader::new();
    let timestamp = Local::now().naive_local();
    let summary = pdfform_core::summarize_directory(&source, &reader, &options, timestamp)
        .inspect_err(|e| error!("{e}"))?;

    if interactive {
        return dialog::show_summary(&summary);
    }

    match output_format {
        "json" => output::json::print(&summary)?,
        _ => {
            output::text::print(&summary);
            for line in output::text::failure_lines(&summary) {
                eprintln!("{line}");
            }
        }
    }

    Ok(())
}
