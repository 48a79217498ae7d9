use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, PdfFormError>;

#[derive(Debug, thiserror::Error)]
pub enum PdfFormError {
    #[error("cannot read source directory {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("cannot list the contents of {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write summary file to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot show dialog: {0}")]
    DialogUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A problem that keeps one PDF out of the summary without stopping the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormDiagnostic {
    #[error("Couldn't read file {file}")]
    Unreadable { file: String },

    #[error("Couldn't process file {file}")]
    NoCatalog { file: String },

    #[error("No form found in file {file}")]
    NoForm { file: String },

    #[error("Form data could not be read from {file}")]
    FormUnreadable { file: String },

    #[error("Form data seems corrupt in {file} (no cross-reference entry for {reference})")]
    MissingXref { file: String, reference: String },

    #[error("Form data seems corrupt in {file} (object {reference} isn't a dictionary)")]
    NotADictionary { file: String, reference: String },

    #[error("Form data seems corrupt in {file} (no name for form field #{index})")]
    MissingName { file: String, index: usize },

    #[error("Form data seems corrupt in {file} (field {reference} is reached more than once)")]
    Cycle { file: String, reference: String },

    #[error("File name {file} is not valid UTF-8")]
    NonUtf8Name { file: String },

    #[error("Form data seems corrupt in {file} (field #{index} nests deeper than {limit} levels)")]
    TooDeep {
        file: String,
        index: usize,
        limit: usize,
    },
}
