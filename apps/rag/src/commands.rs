//! CLI definition, routing, and tracing setup.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use color_eyre::eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{error, info};

use toolkit_core::{RagSession, ResponseGenerator, SessionOptions, ToolCatalog};
use toolkit_index::ChromaIndex;
use toolkit_llm::OpenAiClient;
use toolkit_shared::{AppConfig, OpenAiSettings, load_config, load_config_from, resolve_api_key};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// AI Toolkit RAG System.
#[derive(Parser)]
#[command(
    name = "ai-toolkit-rag",
    version,
    about = "Ask questions about AI engineering tools, answered from a curated catalog.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Query to process.
    #[arg(long)]
    pub query: Option<String>,

    /// Start interactive mode.
    #[arg(long)]
    pub interactive: bool,

    /// Get tools by category.
    #[arg(long)]
    pub category: Option<String>,

    /// Set up the vector store only.
    #[arg(long)]
    pub setup: bool,

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

/// Initialize tracing based on CLI flags.
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
// Command dispatch
// ---------------------------------------------------------------------------

type Session = RagSession<ChromaIndex<Arc<OpenAiClient>>, Arc<OpenAiClient>>;

/// What one invocation does, in flag precedence order.
#[derive(Debug, PartialEq, Eq)]
enum Action<'a> {
    Setup,
    Category(&'a str),
    Help,
    Query(&'a str),
    Interactive,
}

fn action(cli: &Cli) -> Action<'_> {
    if cli.setup {
        Action::Setup
    } else if let Some(category) = cli.category.as_deref() {
        Action::Category(category)
    } else if let Some(query) = cli.query.as_deref() {
        Action::Query(query)
    } else if cli.interactive {
        Action::Interactive
    } else {
        Action::Help
    }
}

/// Run the CLI.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    // The key is required before any work, including catalog-only lookups
    let settings = match resolve_api_key(&config) {
        Ok(settings) => settings,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    match action(&cli) {
        Action::Setup => {
            start_session(&config, settings).await?;
            info!("vector store setup completed");
        }
        Action::Category(category) => print_category(&ToolCatalog::builtin(), category),
        Action::Help => {
            println!("Please provide --query, --interactive, or --category option");
            Cli::command().print_help()?;
        }
        Action::Query(query) => {
            let mut session = start_session(&config, settings).await?;
            let response = session.query(query).await.into_value();
            println!("\nQuery: {query}");
            println!("\nResponse:\n{response}");
        }
        Action::Interactive => {
            let mut session = start_session(&config, settings).await?;
            interactive(&mut session).await?;
        }
    }

    Ok(())
}

async fn start_session(config: &AppConfig, settings: OpenAiSettings) -> Result<Session> {
    let client = Arc::new(OpenAiClient::new(settings)?);
    let index = ChromaIndex::new(&config.chroma, Arc::clone(&client))?;
    info!(collection = index.collection(), "indexing tool catalog");
    let generator = ResponseGenerator::from_config(client, &config.rag);

    let session = RagSession::start(
        ToolCatalog::builtin(),
        index,
        generator,
        SessionOptions::from(&config.rag),
    )
    .await?;
    Ok(session)
}

fn print_category(catalog: &ToolCatalog, category: &str) {
    println!("\n=== Tools in category: {category} ===");
    for tool in catalog.by_category(category) {
        println!("\n{}: {}", tool.name, tool.description);
        println!("URL: {}", tool.url);
    }
}

// ---------------------------------------------------------------------------
// Interactive mode
// ---------------------------------------------------------------------------

/// What one input line asks for.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Clear,
    Skip,
    Question(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "quit" | "exit" | "q" => Input::Quit,
        "clear" => Input::Clear,
        "" => Input::Skip,
        _ => Input::Question(line),
    }
}

async fn interactive(session: &mut Session) -> Result<()> {
    println!("\n🤖 AI Toolkit RAG System - Interactive Mode");
    println!("Ask questions about AI tools and frameworks!");
    println!("Commands: 'clear' to clear history, 'quit' to exit\n");

    let mut editor = DefaultEditor::new()?;

    loop {
        let line = match editor.readline("🔍 Your question: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!("\n\nGoodbye!");
                break;
            }
            Err(e) => {
                println!("Error: {e}");
                continue;
            }
        };

        match classify(&line) {
            Input::Quit => break,
            Input::Clear => {
                session.clear_history();
                println!("✅ Conversation history cleared");
            }
            Input::Skip => {}
            Input::Question(question) => {
                let _ = editor.add_history_entry(question);
                let response = session.query(question).await.into_value();
                println!("\n🤖 Response:\n{response}\n");
                println!("{}", "-".repeat(60));
            }
        }
    }

    Ok(())
}
