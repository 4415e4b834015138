//! Publication record as returned by the medRxiv/bioRxiv "details" API.

use serde::{Deserialize, Deserializer, Serialize};

/// Preprint server the details API is queried for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreprintServer {
    #[default]
    MedRxiv,
    BioRxiv,
}

impl PreprintServer {
    /// Server identifier used in API paths
    pub fn id(&self) -> &'static str {
        match self {
            PreprintServer::MedRxiv => "medrxiv",
            PreprintServer::BioRxiv => "biorxiv",
        }
    }

    /// Human-readable server name
    pub fn display_name(&self) -> &'static str {
        match self {
            PreprintServer::MedRxiv => "medRxiv",
            PreprintServer::BioRxiv => "bioRxiv",
        }
    }

    /// Default base URL of the metadata API
    pub fn api_url(&self) -> &'static str {
        match self {
            PreprintServer::MedRxiv => "https://api.medrxiv.org",
            PreprintServer::BioRxiv => "https://api.biorxiv.org",
        }
    }

    /// Default base URL that full-text PDFs are served from
    pub fn content_url(&self) -> &'static str {
        match self {
            PreprintServer::MedRxiv => "https://www.medrxiv.org/content",
            PreprintServer::BioRxiv => "https://www.biorxiv.org/content",
        }
    }
}

impl std::fmt::Display for PreprintServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A preprint as reported by the details endpoint.
///
/// Every field is kept verbatim. Upstream sends strings throughout, but
/// occasionally uses `null` or a bare number; both are normalized to strings
/// so a single odd record never fails a whole page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Publication {
    #[serde(deserialize_with = "lenient_string")]
    pub doi: String,

    #[serde(deserialize_with = "lenient_string")]
    pub title: String,

    /// Authors (semicolon-separated, as upstream formats them)
    #[serde(deserialize_with = "lenient_string")]
    pub authors: String,

    #[serde(deserialize_with = "lenient_string")]
    pub author_corresponding: String,

    #[serde(deserialize_with = "lenient_string")]
    pub author_corresponding_institution: String,

    /// Posting date (YYYY-MM-DD)
    #[serde(deserialize_with = "lenient_string")]
    pub date: String,

    #[serde(deserialize_with = "lenient_string")]
    pub version: String,

    /// Article type, e.g. "new results"
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub kind: String,

    #[serde(deserialize_with = "lenient_string")]
    pub license: String,

    #[serde(deserialize_with = "lenient_string")]
    pub category: String,

    /// Path to the JATS XML rendition
    #[serde(deserialize_with = "lenient_string")]
    pub jatsxml: String,

    #[serde(rename = "abstract", deserialize_with = "lenient_string")]
    pub r#abstract: String,

    /// Journal DOI once published, "NA" otherwise
    #[serde(deserialize_with = "lenient_string")]
    pub published: String,

    #[serde(deserialize_with = "lenient_string")]
    pub server: String,
}

impl Publication {
    /// Create a publication with just a DOI and title set
    pub fn new(doi: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            doi: doi.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the abstract
    pub fn with_abstract(mut self, text: impl Into<String>) -> Self {
        self.r#abstract = text.into();
        self
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}
