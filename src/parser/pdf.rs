use std::panic::{self, AssertUnwindSafe};

use crate::error::ChatError;

/// Separator appended after every page.
const PAGE_BREAK: &str = "\n\n";

/// Extract the text of a PDF held in memory, page by page, in page order.
pub fn extract_text_from_mem(bytes: &[u8]) -> Result<String, ChatError> {
    let pages = extract_pages(bytes)?;
    tracing::debug!(pages = pages.len(), "extracted PDF pages");
    Ok(join_pages(&pages))
}

/// `pdf_extract` can panic on malformed input instead of returning an error,
/// so the call sits behind an unwind boundary.
fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ChatError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));

    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ChatError::Extraction(format!(
            "Failed to extract text from PDF: {e}"
        ))),
        Err(_) => Err(ChatError::Extraction(
            "Failed to extract text from PDF: the document is malformed".to_string(),
        )),
    }
}

/// Concatenate pages, each followed by a blank line.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(&clean_page(page.as_ref()));
        text.push_str(PAGE_BREAK);
    }
    text
}

/// Collapse the layout of a single page into space separated text runs.
fn clean_page(raw: &str) -> String {
    raw.replace(['\u{0}', '\u{FEFF}'], "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
