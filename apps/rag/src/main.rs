//! AI toolkit RAG CLI: ask questions about AI engineering tools.
//!
//! Indexes the built-in tool catalog into Chroma and answers questions with
//! an OpenAI-compatible chat model grounded on the retrieved entries.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
