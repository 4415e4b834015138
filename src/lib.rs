//! # Preprint Digest
//!
//! Two small automation pipelines for keeping up with preprints:
//!
//! - **harvest**: page through the medRxiv/bioRxiv details API for a date
//!   range, keep the publications whose title or abstract mentions one of the
//!   configured keywords, download their PDFs and save the matches as JSON.
//! - **summarize**: extract the text of every PDF in a directory, summarize
//!   each through a chat-completions API and write one HTML report.
//!
//! ## Architecture
//!
//! - [`models`]: Publication records and summary entries
//! - [`sources`]: medRxiv/bioRxiv API client (pagination, downloads)
//! - [`llm`]: Chat-completions client behind the [`llm::Summarizer`] trait
//! - [`report`]: HTML report composition
//! - [`pipeline`]: The two orchestrators and keyword screening
//! - [`utils`]: HTTP client, PDF extraction, filename sanitizing
//! - [`config`]: Configuration management
//! - [`ui`]: Progress bars and terminal listings

pub mod config;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{PreprintServer, Publication, SummaryEntry};
pub use sources::MedrxivClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
