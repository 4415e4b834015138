//! Configuration file discovery and generation.
//!
//! # Configuration File Format
//!
//! ```toml
//! [summarize]
//! input_dir = "./fetched"
//! prompt_file = "prompts.txt"
//! report_path = "PDF_Summaries.html"
//!
//! [harvest]
//! server = "medrxiv"
//! start_date = "2024-02-12"
//! lookback_days = 7
//! keywords = ["GPT4", "machine learning"]
//! download_pdfs = true
//! download_dir = "./pdf"
//! output_path = "new_medrxiv_publications.json"
//! max_pages = 1000
//!
//! [llm]
//! model = "gpt-4-turbo-preview"
//! base_url = "https://api.openai.com/v1"
//! timeout_secs = 120
//!
//! [http]
//! timeout_secs = 30
//! connect_timeout_secs = 10
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```
//!
//! Dates must be quoted strings.

use std::path::{Path, PathBuf};

use super::{Config, ConfigError};

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "preprint-digest.toml";

/// Find a configuration file in the default locations.
///
/// Checks `./preprint-digest.toml`, then
/// `{config_dir}/preprint-digest/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("preprint-digest").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Write the default configuration as TOML.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::Invalid(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(&Config::default())?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load variables from a `.env` file into the process environment.
///
/// Returns `Ok(false)` when the file does not exist. A file that exists but
/// cannot be read or parsed is an error, so the caller can report it.
pub fn load_env_file(path: &Path) -> Result<bool, dotenvy::Error> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e),
    }
}
