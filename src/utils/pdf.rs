//! PDF discovery and text extraction.
//!
//! Text is extracted with the pdf-extract crate, which walks every page in
//! document order and concatenates the result. The crate is synchronous and
//! has been known to panic on malformed input, so [`PdfTextExtractor`] runs it
//! on the blocking pool and turns a panic into an ordinary error.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during PDF extraction
#[derive(Debug, Error)]
pub enum PdfExtractError {
    #[error("Failed to extract text from PDF: {0}")]
    ExtractionFailed(String),

    #[error("File not found or not a valid PDF: {0}")]
    InvalidFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can turn a PDF on disk into plain text
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<String, PdfExtractError>;
}

/// [`TextExtractor`] backed by pdf-extract
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String, PdfExtractError> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || extract_text(&path))
            .await
            .map_err(|e| PdfExtractError::ExtractionFailed(format!("extraction aborted: {}", e)))?
    }
}

/// List the `.pdf` files directly inside `dir`, sorted by path.
///
/// The extension check is case-insensitive and subdirectories are not
/// descended into.
pub fn find_pdf_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            tracing::debug!("PDF file found: {}", path.display());
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Extract text from a PDF file.
///
/// Returns the text of all pages concatenated in document order.
///
/// # Examples
///
/// ```ignore
/// let text = extract_text(Path::new("paper.pdf"))?;
/// println!("Extracted {} characters", text.len());
/// ```
pub fn extract_text(path: &Path) -> Result<String, PdfExtractError> {
    if !path.exists() {
        return Err(PdfExtractError::InvalidFile(format!(
            "File not found: {}",
            path.display()
        )));
    }

    if !path.is_file() {
        return Err(PdfExtractError::InvalidFile(format!(
            "Not a file: {}",
            path.display()
        )));
    }

    let text = pdf_extract::extract_text(path)
        .map_err(|e| PdfExtractError::ExtractionFailed(e.to_string()))?;

    if text.trim().is_empty() {
        // Likely a scanned or image-only PDF
        tracing::debug!("Extracted empty text from PDF: {}", path.display());
    }

    Ok(text)
}
