use serde::{Deserialize, Serialize};

/// One form field as read from a PDF: its (fully qualified) name and its
/// current value rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub name: String,
    pub value: String,
}

impl FieldEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A PDF that was left out of the summary, with everything that went wrong.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFailure {
    pub filename: String,
    pub diagnostics: Vec<String>,
}
