//! Per-page PDF text extraction.
//!
//! Extraction is best-effort: a page that fails to yield text is logged and
//! skipped rather than failing the document. An unparseable document is an
//! error, and a parseable document with no extractable text at all is
//! treated as a failure by callers that need text (the upload pipeline).

use anyhow::{Context, Result};
use lopdf::Document;
use std::path::Path;

/// Extract the text of every page, skipping pages that fail or are empty.
/// Returns one entry per page that produced text.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>> {
    let doc = Document::load_mem(bytes).context("Failed to parse PDF")?;
    Ok(pages_from(&doc, usize::MAX))
}

/// Extract the text of the first `limit` pages of a PDF file, concatenated.
/// Used by the brochure metadata extractor, which only inspects the cover
/// pages.
pub fn extract_leading_text(path: &Path, limit: usize) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let doc = Document::load_mem(&bytes).context("Failed to parse PDF")?;
    Ok(pages_from(&doc, limit).join("\n"))
}

fn pages_from(doc: &Document, limit: usize) -> Vec<String> {
    let mut pages = Vec::new();
    for (page_no, _) in doc.get_pages().iter().take(limit) {
        match doc.extract_text(&[*page_no]) {
            Ok(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    pages.push(text.to_string());
                }
            }
            Err(e) => {
                tracing::warn!("Text extraction failed for page {page_no}: {e}");
            }
        }
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_is_an_error() {
        let result = extract_pages(b"this is not a pdf at all");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = extract_leading_text(Path::new("/nonexistent/brochure.pdf"), 2);
        assert!(result.is_err());
    }
}
