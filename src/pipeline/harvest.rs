//! Publication harvest pipeline: fetch, screen, download, persist.

use std::path::{Path, PathBuf};

use crate::models::Publication;
use crate::pipeline::filter::KeywordFilter;
use crate::pipeline::PipelineError;
use crate::sources::{DateRange, DownloadError, MedrxivClient};
use crate::ui;

/// Inputs of a harvest run
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    pub range: DateRange,
    pub keywords: Vec<String>,
    /// Where PDFs go; `None` skips downloading
    pub download_dir: Option<PathBuf>,
    /// JSON file receiving the matched publications
    pub output_path: PathBuf,
    pub show_progress: bool,
}

/// A download that did not produce a file
#[derive(Debug)]
pub struct DownloadFailure {
    pub doi: String,
    pub title: String,
    pub error: DownloadError,
}

/// Outcome of a harvest run
#[derive(Debug, Default)]
pub struct HarvestReport {
    /// Publications returned by the server for the range
    pub fetched: usize,
    /// Publications that passed the keyword screen, in server order
    pub matched: Vec<Publication>,
    pub downloaded: Vec<PathBuf>,
    pub failures: Vec<DownloadFailure>,
    pub output_path: PathBuf,
}

/// Write the publications as one pretty-printed JSON array
pub fn persist_publications(path: &Path, publications: &[Publication]) -> Result<(), PipelineError> {
    let json = serde_json::to_string_pretty(publications)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| PipelineError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, json).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Fetch the range, keep keyword matches, download their PDFs and persist
/// the matches as JSON.
///
/// A failed fetch aborts the run. Download failures are logged, collected in
/// the report, and never stop the remaining downloads or the JSON write.
pub async fn run_harvest(
    client: &MedrxivClient,
    options: &HarvestOptions,
) -> Result<HarvestReport, PipelineError> {
    tracing::info!("Fetching {} publications for {}", client.server(), options.range);
    let publications = client.fetch_publications(&options.range).await?;
    let fetched = publications.len();

    let filter = KeywordFilter::new(&options.keywords);
    if filter.is_empty() {
        tracing::warn!("No keywords configured; nothing will match");
    }
    let matched = filter.apply(publications);
    tracing::info!("{} of {} publications match the keywords", matched.len(), fetched);

    let mut report = HarvestReport {
        fetched,
        output_path: options.output_path.clone(),
        ..HarvestReport::default()
    };

    for publication in &matched {
        tracing::info!(
            doi = %publication.doi,
            date = %publication.date,
            authors = %publication.authors,
            "Matched: {}",
            publication.title
        );
    }

    if let Some(dir) = &options.download_dir {
        let progress = ui::progress_bar(matched.len(), "Downloading", options.show_progress);
        for publication in &matched {
            match client.download_pdf(publication, dir).await {
                Ok(path) => report.downloaded.push(path),
                Err(error) => {
                    tracing::warn!("Failed to download {}: {}", publication.title, error);
                    report.failures.push(DownloadFailure {
                        doi: publication.doi.clone(),
                        title: publication.title.clone(),
                        error,
                    });
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();
    }

    persist_publications(&options.output_path, &matched)?;
    tracing::info!(
        "Saved {} publications to {}",
        matched.len(),
        options.output_path.display()
    );

    report.matched = matched;
    Ok(report)
}
