use pdfform_core::RunSummary;

/// Two lines: the title, then the message.
pub fn print(summary: &RunSummary) {
    println!("{}", summary.title());
    println!("{}", summary.message());
}

/// One line per file left out of the summary, for stderr.
pub fn failure_lines(summary: &RunSummary) -> Vec<String> {
    summary
        .failures
        .iter()
        .flat_map(|f| f.diagnostics.iter().map(|d| format!("  skipped: {d}")))
        .collect()
}
