use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "pdfform2csv.log";

/// Environment variable holding the log filter, e.g. `debug`.
pub const LOG_ENV: &str = "PDFFORM2CSV_LOG";

pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

/// Subscriber that appends plain-text log lines to `path`.
///
/// It is installed only for the duration of a run. When the file cannot be
/// opened the run still goes ahead, logging into a sink.
pub fn file_subscriber(path: &Path) -> impl Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
        Err(_) => BoxMakeWriter::new(std::io::sink),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .finish()
}
