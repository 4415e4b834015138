//! Entries produced by the summarization pipeline.

use serde::{Deserialize, Serialize};

/// One successfully summarized document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    /// File name of the source PDF
    pub title: String,

    /// Text returned by the model
    pub summary: String,
}

impl SummaryEntry {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
        }
    }
}
