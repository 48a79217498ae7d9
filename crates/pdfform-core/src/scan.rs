use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{FormDiagnostic, PdfFormError, Result};
use crate::extraction::FormReader;
use crate::model::{FieldEntry, FileFailure};

/// Which directory entries count as PDFs.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Filename suffix a file must end with, e.g. `.pdf`.
    pub extension: String,
    /// Match the suffix ignoring ASCII case (`a.PDF`). Off by default.
    pub case_insensitive: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extension: ".pdf".to_string(),
            case_insensitive: false,
        }
    }
}

impl ScanOptions {
    pub fn matches(&self, filename: &str) -> bool {
        if self.case_insensitive {
            let (name, ext) = (filename.as_bytes(), self.extension.as_bytes());
            name.len() >= ext.len() && name[name.len() - ext.len()..].eq_ignore_ascii_case(ext)
        } else {
            filename.ends_with(&self.extension)
        }
    }
}

/// Everything read from one source directory.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Successfully read files, sorted by name.
    pub files: Vec<String>,
    pub fields: HashMap<String, Vec<FieldEntry>>,
    pub failures: Vec<FileFailure>,
    /// Entries that did not match the extension (or were not files).
    pub skipped: Vec<String>,
}

/// Read the form fields of every matching file directly inside `dir`.
///
/// A file that cannot be read or has no usable form is recorded in
/// `failures` and left out; only problems with `dir` itself are errors.
pub fn scan_directory(
    dir: &Path,
    reader: &dyn FormReader,
    options: &ScanOptions,
) -> Result<ScanResult> {
    let metadata = std::fs::metadata(dir).map_err(|e| PdfFormError::SourceUnreadable {
        path: dir.to_path_buf(),
        source: e,
    })?;
    if !metadata.is_dir() {
        return Err(PdfFormError::NotADirectory(dir.to_path_buf()));
    }

    let read_dir_err = |e| PdfFormError::ReadDir {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut result = ScanResult::default();
    for entry in std::fs::read_dir(dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        let path = entry.path();
        // Lossy names could collide, so a non-UTF-8 name never becomes a row.
        let filename = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                let lossy = raw.to_string_lossy().into_owned();
                if options.matches(&lossy) && path.is_file() {
                    let diagnostic = FormDiagnostic::NonUtf8Name {
                        file: path.display().to_string(),
                    };
                    warn!("{diagnostic}");
                    result.failures.push(FileFailure {
                        filename: lossy,
                        diagnostics: vec![diagnostic.to_string()],
                    });
                } else {
                    result.skipped.push(lossy);
                }
                continue;
            }
        };

        if !options.matches(&filename) || !path.is_file() {
            debug!("Skipping file: {filename}");
            result.skipped.push(filename);
            continue;
        }

        debug!(backend = reader.backend_name(), "Reading file: {filename}");
        let outcome = match std::fs::read(&path) {
            Ok(bytes) => reader.read_fields(&path.display().to_string(), &bytes),
            Err(e) => {
                warn!("cannot read {}: {e}", path.display());
                Err(vec![FormDiagnostic::Unreadable {
                    file: path.display().to_string(),
                }])
            }
        };

        match outcome {
            Ok(fields) => {
                result.fields.insert(filename.clone(), fields);
                result.files.push(filename);
            }
            Err(diagnostics) => {
                for d in &diagnostics {
                    warn!("{d}");
                }
                result.failures.push(FileFailure {
                    filename,
                    diagnostics: diagnostics.iter().map(ToString::to_string).collect(),
                });
            }
        }
    }

    result.files.sort();
    result.failures.sort_by(|a, b| a.filename.cmp(&b.filename));
    result.skipped.sort();
    Ok(result)
}
