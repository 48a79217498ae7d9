use pdfform_core::error::PdfFormError;
use pdfform_core::RunSummary;

pub fn print(summary: &RunSummary) -> Result<(), PdfFormError> {
    let json = serde_json::to_string_pretty(summary)?;
    println!("{json}");
    Ok(())
}
