//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `PREPRINT_DIGEST_*` environment variables (nested keys use `__`, e.g.
//! `PREPRINT_DIGEST_HARVEST__SERVER=biorxiv`). Command-line flags are applied
//! on top by the binary.

mod file_config;

pub use file_config::{find_config_file, load_env_file, write_default_config, CONFIG_FILE_NAME};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::PreprintServer;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "PREPRINT_DIGEST";

/// Environment variable the chat API key falls back to
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// PDF summarization settings
    #[serde(default)]
    pub summarize: SummarizeConfig,

    /// Preprint harvest settings
    #[serde(default)]
    pub harvest: HarvestConfig,

    /// Chat-completions API settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Shared HTTP settings for the preprint API and downloads
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Summarization pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeConfig {
    /// Directory scanned (non-recursively) for PDFs
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Plain-text file holding the system prompt
    #[serde(default = "default_prompt_file")]
    pub prompt_file: PathBuf,

    /// Where the HTML report is written
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            prompt_file: default_prompt_file(),
            report_path: default_report_path(),
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("./fetched")
}

fn default_prompt_file() -> PathBuf {
    PathBuf::from("prompts.txt")
}

fn default_report_path() -> PathBuf {
    PathBuf::from("PDF_Summaries.html")
}

/// Harvest pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Preprint server to query
    #[serde(default)]
    pub server: PreprintServer,

    /// First day of the range (defaults to `lookback_days` before today)
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    /// Last day of the range (defaults to today)
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Case-insensitive substrings matched against title and abstract
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Whether matching PDFs are downloaded
    #[serde(default = "default_true")]
    pub download_pdfs: bool,

    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// JSON file receiving the filtered publications
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Upper bound on page requests per fetch
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Override for the metadata API base URL
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Override for the PDF content base URL
    #[serde(default)]
    pub content_base_url: Option<String>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            server: PreprintServer::default(),
            start_date: None,
            end_date: None,
            lookback_days: default_lookback_days(),
            keywords: default_keywords(),
            download_pdfs: true,
            download_dir: default_download_dir(),
            output_path: default_output_path(),
            max_pages: default_max_pages(),
            api_base_url: None,
            content_base_url: None,
        }
    }
}

impl HarvestConfig {
    /// Metadata API base URL, honoring the override
    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or_else(|| self.server.api_url())
    }

    /// PDF content base URL, honoring the override
    pub fn content_base_url(&self) -> &str {
        self.content_base_url
            .as_deref()
            .unwrap_or_else(|| self.server.content_url())
    }

    /// Resolve the start date against `today`
    pub fn resolved_start(&self, today: NaiveDate) -> NaiveDate {
        self.start_date.unwrap_or_else(|| {
            today
                .checked_sub_days(chrono::Days::new(u64::from(self.lookback_days)))
                .unwrap_or(today)
        })
    }
}

fn default_lookback_days() -> u32 {
    7
}

fn default_keywords() -> Vec<String> {
    [
        "GPT4",
        "machine learning",
        "deep learning",
        "large language model",
        "Anthropic",
        "OpenAI",
        "Artificial Intelligence",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_true() -> bool {
    true
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("./pdf")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("new_medrxiv_publications.json")
}

fn default_max_pages() -> usize {
    1000
}

/// Chat-completions API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key; falls back to `OPENAI_API_KEY` when unset
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_llm_base_url(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl LlmConfig {
    /// The configured key, or the `OPENAI_API_KEY` environment variable
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

fn default_model() -> String {
    "gpt-4-turbo-preview".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_timeout() -> u64 {
    120
}

/// HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Config {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.harvest.max_pages == 0 {
            return Err(ConfigError::Invalid(
                "harvest.max_pages must be at least 1".to_string(),
            ));
        }

        if self.http.timeout_secs == 0 || self.llm.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeouts must be greater than zero".to_string(),
            ));
        }

        let urls = [
            Some(self.llm.base_url.as_str()),
            self.harvest.api_base_url.as_deref(),
            self.harvest.content_base_url.as_deref(),
        ];
        for url in urls.into_iter().flatten() {
            url::Url::parse(url)
                .map_err(|e| ConfigError::Invalid(format!("invalid URL '{}': {}", url, e)))?;
        }

        if let (Some(start), Some(end)) = (self.harvest.start_date, self.harvest.end_date) {
            if start > end {
                return Err(ConfigError::Invalid(format!(
                    "harvest.start_date {} is after harvest.end_date {}",
                    start, end
                )));
            }
        }

        Ok(())
    }
}

/// Load configuration from an optional file plus environment overrides
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("harvest.keywords")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.summarize.input_dir, PathBuf::from("./fetched"));
        assert_eq!(config.harvest.server, PreprintServer::MedRxiv);
        assert_eq!(config.harvest.keywords.len(), 7);
        assert_eq!(config.harvest.max_pages, 1000);
        assert_eq!(config.llm.model, "gpt-4-turbo-preview");
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(
            &path,
            r#"
[summarize]
input_dir = "/tmp/papers"

[harvest]
server = "biorxiv"
start_date = "2024-02-12"
end_date = "2024-02-19"
keywords = ["CRISPR", "organoid"]
download_pdfs = false
max_pages = 5

[llm]
model = "gpt-4o-mini"

[logging]
level = "debug"
format = "json"
"#,
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();

        assert_eq!(config.summarize.input_dir, PathBuf::from("/tmp/papers"));
        assert_eq!(config.summarize.prompt_file, PathBuf::from("prompts.txt"));
        assert_eq!(config.harvest.server, PreprintServer::BioRxiv);
        assert_eq!(
            config.harvest.start_date,
            NaiveDate::from_ymd_opt(2024, 2, 12)
        );
        assert_eq!(config.harvest.keywords, vec!["CRISPR", "organoid"]);
        assert!(!config.harvest.download_pdfs);
        assert_eq!(config.harvest.max_pages, 5);
        assert_eq!(config.harvest.api_base_url(), "https://api.biorxiv.org");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_config_rejects_inverted_range() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[harvest]\nstart_date = \"2024-03-01\"\nend_date = \"2024-02-01\"\n",
        )
        .unwrap();

        assert!(matches!(
            load_config(Some(path.as_path())),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_config_nonexistent() {
        let result = load_config(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.harvest.max_pages = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.harvest.api_base_url = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolved_start_uses_lookback() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 19).unwrap();
        let mut harvest = HarvestConfig::default();
        assert_eq!(
            harvest.resolved_start(today),
            NaiveDate::from_ymd_opt(2024, 2, 12).unwrap()
        );

        harvest.start_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert_eq!(
            harvest.resolved_start(today),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_configured_api_key_wins() {
        let llm = LlmConfig {
            api_key: Some("from-config".to_string()),
            ..LlmConfig::default()
        };
        assert_eq!(llm.resolved_api_key().as_deref(), Some("from-config"));
    }
}
