pub mod lopdf_form;

use crate::error::FormDiagnostic;
use crate::model::FieldEntry;

/// Trait for PDF form-reading backends.
pub trait FormReader {
    /// Read the form fields of one PDF, in document order.
    ///
    /// `source` names the file in diagnostics. Any diagnostic means the file
    /// has no usable form and must be left out of the summary.
    fn read_fields(
        &self,
        source: &str,
        pdf_bytes: &[u8],
    ) -> Result<Vec<FieldEntry>, Vec<FormDiagnostic>>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
