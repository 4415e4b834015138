//! The two pipelines and their shared error type.
//!
//! - [`summarize`]: PDFs on disk → text → chat API → HTML report
//! - [`harvest`]: preprint API → keyword screen → PDF downloads → JSON

pub mod filter;
pub mod harvest;
pub mod summarize;

use std::path::PathBuf;

use crate::sources::SourceError;

pub use filter::{screen_publications, KeywordFilter};
pub use harvest::{persist_publications, run_harvest, DownloadFailure, HarvestOptions, HarvestReport};
pub use summarize::{
    load_prompt, process_file, run_summarize, ItemError, SummarizeOptions, SummaryRun,
};

/// Failures that abort a whole pipeline run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Cannot scan {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot read prompt file {}: {source}", path.display())]
    Prompt {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Prompt file {} is empty", .0.display())]
    EmptyPrompt(PathBuf),

    #[error("Failed to fetch publications: {0}")]
    Fetch(#[from] SourceError),

    #[error("Failed to serialize publications: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
