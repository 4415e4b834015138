//! Core data models for publications and summaries.

mod publication;
mod summary;

pub use publication::{PreprintServer, Publication};
pub use summary::SummaryEntry;
