//! Input validation for DOIs and file names derived from untrusted titles.
//!
//! Titles come straight from the preprint API and are used to name
//! downloaded PDFs, so they must never be able to escape the download
//! directory or produce a name the filesystem rejects.

use thiserror::Error;

/// Validation error types
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid DOI format: {0}")]
    InvalidDoi(String),

    #[error("Invalid filename: nothing usable left after sanitizing")]
    InvalidFilename,
}

/// Longest file stem kept, in bytes
pub const MAX_FILENAME_STEM: usize = 200;

const RESERVED_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Validate a DOI before it is spliced into a download URL.
///
/// DOIs have the format "10.xxxx/xxxxxx". A `doi:` or `https://doi.org/`
/// prefix is stripped; the case of the suffix is preserved.
pub fn validate_doi(doi: &str) -> Result<String, ValidationError> {
    let doi = doi.trim();

    if doi.is_empty() {
        return Err(ValidationError::InvalidDoi("empty DOI".to_string()));
    }

    let doi = doi.strip_prefix("doi:").unwrap_or(doi);
    let doi = doi.strip_prefix("https://doi.org/").unwrap_or(doi);
    let doi = doi.strip_prefix("http://doi.org/").unwrap_or(doi);

    if !doi.starts_with("10.") {
        return Err(ValidationError::InvalidDoi(
            "DOI must start with '10.'".to_string(),
        ));
    }

    if !doi.contains('/') {
        return Err(ValidationError::InvalidDoi(
            "DOI must contain a slash".to_string(),
        ));
    }

    if doi.contains("..") || doi.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::InvalidDoi(format!(
            "unsafe characters in DOI: {}",
            doi
        )));
    }

    Ok(doi.to_string())
}

/// Turn an arbitrary title into a safe file stem.
///
/// Path separators, reserved characters and control characters become
/// spaces, whitespace runs collapse to one space, leading and trailing dots
/// and spaces are dropped, and the result is capped at
/// [`MAX_FILENAME_STEM`] bytes on a char boundary.
pub fn sanitize_filename(name: &str) -> Result<String, ValidationError> {
    let mut sanitized = String::with_capacity(name.len());
    let mut pending_space = false;

    for ch in name.chars() {
        let ch = if RESERVED_CHARS.contains(&ch) || ch.is_control() {
            ' '
        } else {
            ch
        };

        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }

        if pending_space && !sanitized.is_empty() {
            sanitized.push(' ');
        }
        pending_space = false;
        sanitized.push(ch);
    }

    let is_edge = |c: char| c == '.' || c == ' ';
    let trimmed = sanitized.trim_matches(is_edge);

    let mut end = trimmed.len().min(MAX_FILENAME_STEM);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    let capped = trimmed[..end].trim_end_matches(is_edge);

    if capped.is_empty() {
        return Err(ValidationError::InvalidFilename);
    }

    Ok(capped.to_string())
}

/// File name for a downloaded PDF.
///
/// Uses the sanitized title, falling back to the DOI (slashes replaced) and
/// finally to `publication`.
pub fn pdf_filename(title: &str, doi: &str) -> String {
    format!("{}.pdf", pdf_stem(title, doi))
}

/// File name for a downloaded PDF whose plain name is already taken.
///
/// Appends the DOI (slashes replaced) so two publications whose titles
/// sanitize to the same stem still land in different files.
pub fn pdf_filename_with_doi(title: &str, doi: &str) -> String {
    let stem = pdf_stem(title, doi);
    match sanitize_filename(&doi.replace('/', "_")) {
        Ok(doi_stem) if doi_stem != stem => format!("{} ({}).pdf", stem, doi_stem),
        _ => format!("{}.pdf", stem),
    }
}

fn pdf_stem(title: &str, doi: &str) -> String {
    sanitize_filename(title)
        .or_else(|_| sanitize_filename(&doi.replace('/', "_")))
        .unwrap_or_else(|_| "publication".to_string())
}
