//! AI toolkit content CLI: build a weekly newsletter from recent AI news.
//!
//! Pulls the configured RSS / Atom feeds, has the chat model write the
//! intro, news summary and tool picks, and renders HTML or Markdown.

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
