//! PDF summarization pipeline: scan, extract, summarize, compose, write.

use std::path::{Path, PathBuf};

use crate::llm::{LlmError, Summarizer};
use crate::models::SummaryEntry;
use crate::pipeline::PipelineError;
use crate::report::compose_html;
use crate::ui;
use crate::utils::{find_pdf_files, PdfExtractError, TextExtractor};

/// Why a single file produced no summary
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("Failed to extract text from PDF: {file} ({source})")]
    Extraction {
        file: String,
        source: PdfExtractError,
    },

    #[error("Failed to summarize PDF: {file} ({source})")]
    Summarization { file: String, source: LlmError },
}

/// Inputs of a summarization run
#[derive(Debug, Clone)]
pub struct SummarizeOptions {
    pub input_dir: PathBuf,
    pub prompt_file: PathBuf,
    pub report_path: PathBuf,
    pub show_progress: bool,
}

/// Outcome of a summarization run
#[derive(Debug, Clone, Default)]
pub struct SummaryRun {
    /// Number of PDFs found
    pub files: usize,
    pub summaries: Vec<SummaryEntry>,
    /// Error entries, in file order
    pub errors: Vec<String>,
    /// Written report, `None` when there was nothing to summarize
    pub report_path: Option<PathBuf>,
}

/// Read the system prompt; surrounding whitespace is trimmed
pub fn load_prompt(path: &Path) -> Result<String, PipelineError> {
    let prompt = std::fs::read_to_string(path)
        .map_err(|source| PipelineError::Prompt {
            path: path.to_path_buf(),
            source,
        })?
        .trim()
        .to_string();

    if prompt.is_empty() {
        return Err(PipelineError::EmptyPrompt(path.to_path_buf()));
    }

    tracing::info!("Prompt read from {}", path.display());
    Ok(prompt)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Extract and summarize one PDF
pub async fn process_file(
    path: &Path,
    prompt: &str,
    extractor: &dyn TextExtractor,
    summarizer: &dyn Summarizer,
) -> Result<SummaryEntry, ItemError> {
    let file = display_name(path);

    let text = extractor
        .extract(path)
        .await
        .map_err(|source| ItemError::Extraction {
            file: file.clone(),
            source,
        })?;

    let summary = summarizer
        .summarize(prompt, &text)
        .await
        .map_err(|source| ItemError::Summarization {
            file: file.clone(),
            source,
        })?;

    Ok(SummaryEntry::new(file, summary))
}

/// Summarize every PDF in the input directory into one HTML report.
///
/// Directory and prompt failures abort the run. Per-file failures become
/// error entries in the report. Nothing is written when the directory holds
/// no PDFs.
pub async fn run_summarize(
    options: &SummarizeOptions,
    extractor: &dyn TextExtractor,
    summarizer: &dyn Summarizer,
) -> Result<SummaryRun, PipelineError> {
    let files = find_pdf_files(&options.input_dir).map_err(|source| PipelineError::Scan {
        path: options.input_dir.clone(),
        source,
    })?;

    if files.is_empty() {
        tracing::warn!("No PDF files found in {}", options.input_dir.display());
        return Ok(SummaryRun::default());
    }
    tracing::info!("Found {} PDF files", files.len());

    let prompt = load_prompt(&options.prompt_file)?;

    let mut run = SummaryRun {
        files: files.len(),
        ..SummaryRun::default()
    };

    let progress = ui::progress_bar(files.len(), "Summarizing", options.show_progress);
    for path in &files {
        progress.set_message(display_name(path));
        match process_file(path, &prompt, extractor, summarizer).await {
            Ok(entry) => {
                tracing::info!("Summarized {}", entry.title);
                run.summaries.push(entry);
            }
            Err(e) => {
                tracing::warn!("{}", e);
                run.errors.push(e.to_string());
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    let html = compose_html(&run.summaries, &run.errors);
    if let Some(parent) = options
        .report_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent).map_err(|source| PipelineError::Write {
            path: options.report_path.clone(),
            source,
        })?;
    }
    std::fs::write(&options.report_path, html).map_err(|source| PipelineError::Write {
        path: options.report_path.clone(),
        source,
    })?;

    tracing::info!(
        summaries = run.summaries.len(),
        errors = run.errors.len(),
        "Summaries and errors written to {}",
        options.report_path.display()
    );
    run.report_path = Some(options.report_path.clone());
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempfile::tempdir;

    struct EchoExtractor;

    #[async_trait]
    impl TextExtractor for EchoExtractor {
        async fn extract(&self, path: &Path) -> Result<String, PdfExtractError> {
            Ok(format!("text of {}", display_name(path)))
        }
    }

    struct FailingSummarizer;

    #[async_trait]
    impl Summarizer for FailingSummarizer {
        async fn summarize(&self, _prompt: &str, _text: &str) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 400,
                body: "too long".to_string(),
            })
        }
    }

    struct UppercaseSummarizer;

    #[async_trait]
    impl Summarizer for UppercaseSummarizer {
        async fn summarize(&self, prompt: &str, text: &str) -> Result<String, LlmError> {
            Ok(format!("{}: {}", prompt, text.to_uppercase()))
        }
    }

    #[test]
    fn test_load_prompt_trims() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prompts.txt");
        std::fs::write(&path, "\n  Summarize the paper.  \n").unwrap();
        assert_eq!(load_prompt(&path).unwrap(), "Summarize the paper.");
    }

    #[test]
    fn test_load_prompt_missing_or_empty() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        assert!(matches!(
            load_prompt(&missing),
            Err(PipelineError::Prompt { .. })
        ));

        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "   \n").unwrap();
        assert!(matches!(
            load_prompt(&empty),
            Err(PipelineError::EmptyPrompt(_))
        ));
    }

    #[tokio::test]
    async fn test_process_file_success() {
        let entry = process_file(
            Path::new("/papers/a.pdf"),
            "P",
            &EchoExtractor,
            &UppercaseSummarizer,
        )
        .await
        .unwrap();

        assert_eq!(entry, SummaryEntry::new("a.pdf", "P: TEXT OF A.PDF"));
    }

    #[tokio::test]
    async fn test_process_file_summarization_error_names_file() {
        let err = process_file(
            Path::new("/papers/a.pdf"),
            "P",
            &EchoExtractor,
            &FailingSummarizer,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ItemError::Summarization { .. }));
        assert!(err.to_string().starts_with("Failed to summarize PDF: a.pdf"));
    }

    #[tokio::test]
    async fn test_run_without_pdfs_writes_nothing() {
        let dir = tempdir().unwrap();
        let options = SummarizeOptions {
            input_dir: dir.path().to_path_buf(),
            prompt_file: dir.path().join("missing-prompt.txt"),
            report_path: dir.path().join("report.html"),
            show_progress: false,
        };

        let run = run_summarize(&options, &EchoExtractor, &UppercaseSummarizer)
            .await
            .unwrap();

        assert_eq!(run.files, 0);
        assert!(run.report_path.is_none());
        assert!(!options.report_path.exists());
    }

    #[tokio::test]
    async fn test_run_missing_directory_aborts() {
        let dir = tempdir().unwrap();
        let options = SummarizeOptions {
            input_dir: dir.path().join("nope"),
            prompt_file: dir.path().join("prompts.txt"),
            report_path: dir.path().join("report.html"),
            show_progress: false,
        };

        let result = run_summarize(&options, &EchoExtractor, &UppercaseSummarizer).await;
        assert!(matches!(result, Err(PipelineError::Scan { .. })));
    }

    #[tokio::test]
    async fn test_run_all_summaries_fail_still_writes_report() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("prompts.txt"), "P").unwrap();
        let options = SummarizeOptions {
            input_dir: dir.path().to_path_buf(),
            prompt_file: dir.path().join("prompts.txt"),
            report_path: dir.path().join("out").join("report.html"),
            show_progress: false,
        };

        let run = run_summarize(&options, &EchoExtractor, &FailingSummarizer)
            .await
            .unwrap();

        assert!(run.summaries.is_empty());
        assert_eq!(run.errors.len(), 1);
        let html = std::fs::read_to_string(&options.report_path).unwrap();
        assert!(html.contains("Failed to summarize PDF: a.pdf"));
    }
}
