//! Clipboard functionality for copying calculator results.

use arboard::Clipboard;
use thiserror::Error;
use tracing::debug;

use super::evaluation::CalcResult;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to access clipboard: {0}")]
    Access(#[source] arboard::Error),

    #[error("failed to copy to clipboard: {0}")]
    Copy(#[source] arboard::Error),

    #[error("nothing to copy: {0}")]
    NotANumber(String),
}

/// Copy a successful result's display string to the system clipboard.
///
/// Errors are refused: their label is not something worth pasting.
pub fn copy_result(result: &CalcResult) -> Result<(), ClipboardError> {
    if !result.is_success() {
        return Err(ClipboardError::NotANumber(result.display().to_string()));
    }

    let mut clipboard = Clipboard::new().map_err(ClipboardError::Access)?;
    clipboard
        .set_text(result.display().to_string())
        .map_err(ClipboardError::Copy)?;

    debug!(text = result.display(), "copied result to clipboard");
    Ok(())
}
