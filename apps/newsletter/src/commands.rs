//! CLI definition, routing, and tracing setup.

use std::path::{Path, PathBuf};

use chrono::Local;
use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, warn};

use toolkit_feeds::{HttpFeedFetcher, NewsAggregator};
use toolkit_llm::OpenAiClient;
use toolkit_newsletter::{
    ContentGenerator, Newsletter, NewsletterProgress, NewsletterRequest, OutputFormat,
    build_newsletter,
};
use toolkit_shared::{load_config, load_config_from, resolve_api_key};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Generate AI Engineering newsletter content.
#[derive(Parser)]
#[command(
    name = "ai-toolkit-content",
    version,
    about = "Generate a weekly AI engineering newsletter from recent news feeds.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Newsletter topic.
    #[arg(long, default_value = "AI Engineering")]
    pub topic: String,

    /// Output format: html or markdown (md).
    #[arg(long, default_value = "html")]
    pub format: OutputFormat,

    /// Output file path (defaults to stdout).
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Days back to fetch news (defaults to the configured window, 7).
    #[arg(long)]
    pub days: Option<u32>,

    /// Config file (defaults to ~/.ai-toolkit/ai-toolkit.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Default log directives: library crates plus this binary's own target.
fn default_filter(verbose: u8) -> String {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    format!("toolkit={level},{}={level}", env!("CARGO_CRATE_NAME"))
}

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout
/// carries only the document.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = default_filter(cli.verbose);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Run the CLI.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    let settings = match resolve_api_key(&config) {
        Ok(settings) => settings,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let news = &config.news;
    let fetcher = HttpFeedFetcher::new(news.max_entries_per_feed, news.missing_date)?;
    let aggregator = NewsAggregator::from_config(fetcher, &news.feeds)?;
    let generator = ContentGenerator::new(OpenAiClient::new(settings)?, news.max_summary_items);

    let request = NewsletterRequest {
        topic: cli.topic.clone(),
        format: cli.format,
        days_back: cli.days.unwrap_or(news.days_back),
        now: Local::now(),
    };

    info!(topic = %request.topic, days_back = request.days_back, "generating newsletter");

    let reporter = CliProgress::new();
    let newsletter = build_newsletter(&aggregator, &generator, &request, &reporter).await;

    if !newsletter.degraded_sections.is_empty() {
        warn!(
            sections = ?newsletter.degraded_sections,
            "newsletter contains fallback sections"
        );
    }

    match cli.output.as_deref() {
        Some(path) => {
            let path = output_path(path, request.format);
            write_document(&path, &newsletter.document)?;
            info!(path = %path.display(), "newsletter saved");
        }
        None => println!("{}", newsletter.document),
    }

    info!(
        items = newsletter.item_count,
        elapsed_secs = format!("{:.1}", newsletter.elapsed.as_secs_f64()),
        "newsletter generation completed"
    );
    Ok(())
}

/// `path`, with the format's extension added when it has none.
fn output_path(path: &Path, format: OutputFormat) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(format.extension())
    }
}

fn write_document(path: &Path, document: &str) -> Result<()> {
    std::fs::write(path, document)
        .map_err(|e| eyre!("failed to write newsletter to {}: {e}", path.display()))
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner on stderr.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl NewsletterProgress for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn news_collected(&self, count: usize) {
        self.spinner.set_message(format!("Collected {count} news items"));
    }

    fn done(&self, _newsletter: &Newsletter) {
        self.spinner.finish_and_clear();
    }
}
