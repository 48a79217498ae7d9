use pdfform_core::error::PdfFormError;
use pdfform_core::RunSummary;
use std::path::PathBuf;

#[cfg(feature = "dialog")]
mod native {
    use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
    use std::path::PathBuf;

    pub fn info(title: &str, message: &str) {
        let _ = MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }

    pub fn pick_folder() -> Option<PathBuf> {
        FileDialog::new()
            .set_title("Directory with PDF files")
            .pick_folder()
    }
}

/// Greet the user and ask for the source directory. `None` when the picker
/// was cancelled.
#[cfg(feature = "dialog")]
pub fn pick_directory() -> Result<Option<PathBuf>, PdfFormError> {
    native::info(
        "Welcome",
        "Welcome to the PDF Form Data to CSV file Tool",
    );
    match native::pick_folder() {
        Some(dir) => Ok(Some(dir)),
        None => {
            tracing::info!("no directory selected");
            native::info("No selection", "You didn't choose anything.");
            Ok(None)
        }
    }
}

#[cfg(not(feature = "dialog"))]
pub fn pick_directory() -> Result<Option<PathBuf>, PdfFormError> {
    Err(PdfFormError::DialogUnavailable(
        "this build has no folder picker, pass the directory as an argument".into(),
    ))
}

#[cfg(feature = "dialog")]
pub fn show_summary(summary: &RunSummary) -> Result<(), PdfFormError> {
    native::info(summary.title(), &summary.message());
    Ok(())
}

#[cfg(not(feature = "dialog"))]
pub fn show_summary(summary: &RunSummary) -> Result<(), PdfFormError> {
    Err(PdfFormError::DialogUnavailable(format!(
        "cannot show result '{}'",
        summary.title()
    )))
}
