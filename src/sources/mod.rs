//! Preprint server clients.
//!
//! [`MedrxivClient`] talks to the shared medRxiv/bioRxiv "details" API: it
//! pages through every publication posted in a date range and downloads
//! full-text PDFs.

mod medrxiv;

pub use medrxiv::{DateRange, DetailsPage, MedrxivClient};

/// Errors that can occur when fetching publication metadata
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-success status
    #[error("API error: {0}")]
    Api(String),

    /// The response body could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// The request itself is malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The server kept reporting more items than the page guard allows
    #[error("Gave up after {max_pages} pages ({fetched} publications fetched, server still reports more)")]
    PaginationLimit { max_pages: usize, fetched: usize },
}

/// Errors that can occur when downloading a single PDF
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Cannot build download URL: {0}")]
    InvalidDoi(#[from] crate::utils::ValidationError),

    #[error("Server returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
