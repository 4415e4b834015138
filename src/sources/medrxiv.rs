//! medRxiv/bioRxiv details API client.
//!
//! Both servers expose the same API with just a different host and server
//! segment, so one client covers either.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

use crate::models::{PreprintServer, Publication};
use crate::sources::{DownloadError, SourceError};
use crate::utils::{pdf_filename, pdf_filename_with_doi, validate_doi, HttpClient};

/// Default upper bound on page requests for one fetch
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Inclusive range of posting dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range; `end` defaults to today (local time)
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self, SourceError> {
        let end = end.unwrap_or_else(|| Local::now().date_naive());
        if start > end {
            return Err(SourceError::InvalidRequest(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.start.format("%Y-%m-%d"), self.end.format("%Y-%m-%d"))
    }
}

/// One page of the details endpoint
#[derive(Debug, Clone, Default)]
pub struct DetailsPage {
    pub publications: Vec<Publication>,

    /// Total item count for the whole range, if the server reported one
    pub total: Option<usize>,
}

/// Client for the medRxiv/bioRxiv details API
#[derive(Debug, Clone)]
pub struct MedrxivClient {
    client: HttpClient,
    server: PreprintServer,
    api_base: String,
    content_base: String,
    max_pages: usize,
}

impl MedrxivClient {
    /// Create a client for `server` using its public endpoints
    pub fn new(server: PreprintServer, client: HttpClient) -> Self {
        Self {
            client,
            server,
            api_base: server.api_url().to_string(),
            content_base: server.content_url().to_string(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Point the metadata requests at a different host
    pub fn with_api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Point the PDF downloads at a different host
    pub fn with_content_base(mut self, url: impl Into<String>) -> Self {
        self.content_base = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Cap the number of page requests per fetch
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn server(&self) -> PreprintServer {
        self.server
    }

    fn page_url(&self, range: &DateRange, cursor: usize) -> String {
        format!(
            "{}/details/{}/{}/{}/json",
            self.api_base,
            self.server.id(),
            range,
            cursor
        )
    }

    /// URL of the full-text PDF for a DOI
    pub fn pdf_url(&self, doi: &str) -> String {
        format!("{}/{}.full.pdf", self.content_base, doi)
    }

    /// Fetch a single page starting at `cursor`
    pub async fn fetch_page(
        &self,
        range: &DateRange,
        cursor: usize,
    ) -> Result<DetailsPage, SourceError> {
        let url = self.page_url(range, cursor);
        let display_name = self.server.display_name();
        tracing::debug!(%url, cursor, "Fetching {} page", display_name);

        let response = self.client.get(&url).send().await.map_err(|e| {
            SourceError::Network(format!("Failed to fetch from {}: {}", display_name, e))
        })?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "{} API returned status: {}",
                display_name,
                response.status()
            )));
        }

        let json: ApiResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse JSON: {}", e)))?;

        let total = json.messages.first().and_then(|message| {
            if let Some(status) = &message.status {
                tracing::debug!(status = %status, "{} page status", display_name);
            }
            message.total.or(message.count)
        });

        Ok(DetailsPage {
            publications: json.collection,
            total,
        })
    }

    /// Fetch every publication posted in `range`.
    ///
    /// Pages are requested with a running cursor until the cursor plus the
    /// last batch reaches the server-reported total. A page without a
    /// message block, or an empty batch, also ends the fetch. At most
    /// `max_pages` requests are made; hitting that cap is an error.
    pub async fn fetch_publications(
        &self,
        range: &DateRange,
    ) -> Result<Vec<Publication>, SourceError> {
        let mut cursor = 0usize;
        let mut all_publications = Vec::new();

        for _ in 0..self.max_pages {
            let page = self.fetch_page(range, cursor).await?;
            let batch_len = page.publications.len();
            all_publications.extend(page.publications);

            let Some(total) = page.total else {
                tracing::debug!("No message block at cursor {}, stopping", cursor);
                return Ok(all_publications);
            };

            if cursor + batch_len >= total {
                all_publications.truncate(total);
                tracing::info!(
                    "Fetched {} publications from {} for {}",
                    all_publications.len(),
                    self.server,
                    range
                );
                return Ok(all_publications);
            }

            if batch_len == 0 {
                tracing::warn!(
                    "{} returned an empty page at cursor {} but reports {} items; stopping",
                    self.server,
                    cursor,
                    total
                );
                return Ok(all_publications);
            }

            cursor += batch_len;
        }

        Err(SourceError::PaginationLimit {
            max_pages: self.max_pages,
            fetched: all_publications.len(),
        })
    }

    /// Download the full-text PDF of `publication` into `output_dir`.
    ///
    /// The directory is created if needed and the file is named after the
    /// sanitized title; if that name is taken, the DOI is appended. Only
    /// HTTP 200 counts as success.
    pub async fn download_pdf(
        &self,
        publication: &Publication,
        output_dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let doi = validate_doi(&publication.doi)?;
        let url = self.pdf_url(&doi);

        std::fs::create_dir_all(output_dir)?;

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DownloadError::Network(format!("Failed to download PDF: {}", e)))?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(DownloadError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DownloadError::Network(format!("Failed to read PDF: {}", e)))?;

        let mut path = output_dir.join(pdf_filename(&publication.title, &doi));
        if path.exists() {
            let renamed = output_dir.join(pdf_filename_with_doi(&publication.title, &doi));
            tracing::warn!(
                "{} already exists, saving {} as {}",
                path.display(),
                doi,
                renamed.display()
            );
            path = renamed;
        }
        std::fs::write(&path, bytes.as_ref())?;

        tracing::info!("Downloaded: {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// API response structure for the details endpoint
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    collection: Vec<Publication>,
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    total: Option<usize>,
    #[serde(default, deserialize_with = "lenient_count")]
    count: Option<usize>,
}

/// Counts arrive as numbers or numeric strings depending on the endpoint
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().map(|n| n as usize),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
