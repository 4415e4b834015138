//! Utility modules supporting both pipelines.
//!
//! - [`HttpClient`]: HTTP client with request and connect timeouts
//! - [`find_pdf_files`]: List the PDFs in a directory
//! - [`extract_text`] / [`PdfTextExtractor`]: Extract text content from PDF files
//! - [`sanitize_filename`] / [`pdf_filename`] / [`pdf_filename_with_doi`]: Safe file names from untrusted titles
//! - [`validate_doi`]: Check a DOI before building URLs from it

mod http;
mod pdf;
mod validate;

pub use http::{HttpClient, DEFAULT_USER_AGENT};
pub use pdf::{extract_text, find_pdf_files, PdfExtractError, PdfTextExtractor, TextExtractor};
pub use validate::{
    pdf_filename, pdf_filename_with_doi, sanitize_filename, validate_doi, ValidationError,
    MAX_FILENAME_STEM,
};
