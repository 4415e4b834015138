use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use preprint_digest::config::{
    find_config_file, load_config, load_env_file, write_default_config, Config, LogFormat,
    LoggingConfig, CONFIG_FILE_NAME,
};
use preprint_digest::llm::ChatClient;
use preprint_digest::models::PreprintServer;
use preprint_digest::pipeline::{run_harvest, run_summarize, HarvestOptions, SummarizeOptions};
use preprint_digest::sources::{DateRange, MedrxivClient};
use preprint_digest::ui;
use preprint_digest::utils::{HttpClient, PdfTextExtractor};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Preprint Digest - harvest keyword-matched preprints and summarize PDFs
#[derive(Parser, Debug)]
#[command(name = "preprint-digest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Harvest keyword-matched preprints and summarize PDFs into an HTML digest", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds for the preprint API and downloads
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Preprint servers
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Server {
    #[value(name = "medrxiv")]
    Medrxiv,
    #[value(name = "biorxiv")]
    Biorxiv,
}

impl From<Server> for PreprintServer {
    fn from(server: Server) -> Self {
        match server {
            Server::Medrxiv => PreprintServer::MedRxiv,
            Server::Biorxiv => PreprintServer::BioRxiv,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize every PDF in a directory into one HTML report
    #[command(alias = "s")]
    Summarize {
        /// Directory holding the PDFs
        #[arg(long, short)]
        input_dir: Option<PathBuf>,

        /// File containing the system prompt
        #[arg(long, short)]
        prompt: Option<PathBuf>,

        /// HTML report path
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Chat model identifier
        #[arg(long, short)]
        model: Option<String>,
    },

    /// Fetch recent preprints, keep keyword matches and download their PDFs
    #[command(alias = "h")]
    Harvest {
        /// Preprint server to query
        #[arg(long, short, value_enum)]
        server: Option<Server>,

        /// First posting date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last posting date (YYYY-MM-DD, default: today)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Keyword to match (repeatable; replaces the configured list)
        #[arg(long = "keyword", short)]
        keywords: Vec<String>,

        /// Directory for downloaded PDFs
        #[arg(long)]
        download_dir: Option<PathBuf>,

        /// JSON file for the matched publications
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Only list and save matches, do not download PDFs
        #[arg(long)]
        no_download: bool,

        /// Maximum number of API pages to request
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Write a configuration file with the default settings
    InitConfig {
        /// Destination (default: ./preprint-digest.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(verbose: u8, quiet: bool, logging: &LoggingConfig) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("preprint_digest={}", level)),
    );

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    if installed.is_err() {
        tracing::debug!("Global subscriber already installed, keeping it");
    }
}

async fn summarize(config: &Config, quiet: bool) -> Result<()> {
    let api_key = config
        .llm
        .resolved_api_key()
        .context("no chat API key: set OPENAI_API_KEY or llm.api_key")?;
    let summarizer = ChatClient::new(api_key, &config.llm, &config.http)?;

    let options = SummarizeOptions {
        input_dir: config.summarize.input_dir.clone(),
        prompt_file: config.summarize.prompt_file.clone(),
        report_path: config.summarize.report_path.clone(),
        show_progress: !quiet,
    };

    let run = run_summarize(&options, &PdfTextExtractor, &summarizer).await?;

    if !quiet {
        match &run.report_path {
            Some(path) => {
                ui::success(&format!(
                    "{} of {} PDFs summarized, report written to {}",
                    run.summaries.len(),
                    run.files,
                    path.display()
                ));
                if !run.errors.is_empty() {
                    ui::warning(&format!("{} files failed, see the Errors section", run.errors.len()));
                }
            }
            None => ui::warning(&format!(
                "No PDF files found in {}",
                options.input_dir.display()
            )),
        }
    }
    Ok(())
}

async fn harvest(config: &Config, quiet: bool) -> Result<()> {
    let settings = &config.harvest;
    let today = Local::now().date_naive();
    let range = DateRange::new(
        settings.resolved_start(today),
        Some(settings.end_date.unwrap_or(today)),
    )?;

    let client = MedrxivClient::new(settings.server, HttpClient::from_config(&config.http)?)
        .with_api_base(settings.api_base_url())
        .with_content_base(settings.content_base_url())
        .with_max_pages(settings.max_pages);

    let options = HarvestOptions {
        range,
        keywords: settings.keywords.clone(),
        download_dir: settings
            .download_pdfs
            .then(|| settings.download_dir.clone()),
        output_path: settings.output_path.clone(),
        show_progress: !quiet,
    };

    let report = run_harvest(&client, &options).await?;

    if !quiet {
        for publication in &report.matched {
            ui::print_publication(publication);
        }
        println!();
        ui::success(&format!(
            "{} of {} publications matched, {} PDFs downloaded, list saved to {}",
            report.matched.len(),
            report.fetched,
            report.downloaded.len(),
            report.output_path.display()
        ));
        for failure in &report.failures {
            ui::warning(&format!("{} ({}): {}", failure.title, failure.doi, failure.error));
        }
    }
    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
    }

    match &cli.command {
        Commands::Summarize {
            input_dir,
            prompt,
            output,
            model,
        } => {
            if let Some(dir) = input_dir {
                config.summarize.input_dir = dir.clone();
            }
            if let Some(prompt) = prompt {
                config.summarize.prompt_file = prompt.clone();
            }
            if let Some(output) = output {
                config.summarize.report_path = output.clone();
            }
            if let Some(model) = model {
                config.llm.model = model.clone();
            }
        }
        Commands::Harvest {
            server,
            from,
            to,
            keywords,
            download_dir,
            output,
            no_download,
            max_pages,
        } => {
            let harvest = &mut config.harvest;
            if let Some(server) = server {
                harvest.server = (*server).into();
            }
            if from.is_some() {
                harvest.start_date = *from;
            }
            if to.is_some() {
                harvest.end_date = *to;
            }
            if !keywords.is_empty() {
                harvest.keywords = keywords.clone();
            }
            if let Some(dir) = download_dir {
                harvest.download_dir = dir.clone();
            }
            if let Some(output) = output {
                harvest.output_path = output.clone();
            }
            if *no_download {
                harvest.download_pdfs = false;
            }
            if let Some(max_pages) = max_pages {
                harvest.max_pages = *max_pages;
            }
        }
        Commands::InitConfig { .. } => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run(Cli::parse()).await
}

/// Run one command.
///
/// Only setup failures (config file, invalid settings, `init-config`) are
/// returned; a failing pipeline is logged and still yields `Ok(())`.
async fn run(cli: Cli) -> Result<()> {
    if let Commands::InitConfig { path, force } = &cli.command {
        let path = path.clone().unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        write_default_config(&path, *force)?;
        if !cli.quiet {
            ui::success(&format!("Configuration written to {}", path.display()));
        }
        return Ok(());
    }

    // .env may carry OPENAI_API_KEY and PREPRINT_DIGEST_* overrides
    let dotenv = load_env_file(Path::new(".env"));

    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("loading {}", path.display()),
        None => "loading configuration from the environment".to_string(),
    })?;
    apply_overrides(&mut config, &cli);
    config.validate()?;

    init_tracing(cli.verbose, cli.quiet, &config.logging);
    if let Err(e) = dotenv {
        tracing::warn!("Ignoring .env: {}", e);
    }
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let outcome = match cli.command {
        Commands::Summarize { .. } => summarize(&config, cli.quiet).await,
        Commands::Harvest { .. } => harvest(&config, cli.quiet).await,
        Commands::InitConfig { .. } => Ok(()),
    };

    if let Err(e) = outcome {
        tracing::error!("{:#}", e);
    }
    Ok(())
}
