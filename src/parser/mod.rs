mod pdf;

use std::path::Path;

use crate::error::ChatError;

#[cfg(test)]
pub use pdf::join_pages;

/// Load a PDF from disk and return its text.
///
/// Only `.pdf` files are accepted. Every failure, including an unreadable
/// file, is reported as [`ChatError::Extraction`] so the caller can show it in
/// place of the welcome message.
pub fn extract_document(path: &Path) -> Result<String, ChatError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if extension != "pdf" {
        return Err(ChatError::Extraction(format!(
            "Unsupported file type: '{}'. Only PDF documents are accepted.",
            path.display()
        )));
    }

    let bytes = std::fs::read(path).map_err(|e| {
        ChatError::Extraction(format!("Failed to read PDF file {}: {}", path.display(), e))
    })?;

    let text = pdf::extract_text_from_mem(&bytes)?;
    if text.trim().is_empty() {
        tracing::warn!(path = %path.display(), "PDF contains no extractable text");
    }

    Ok(text)
}
