//! blogcards CLI: preview cards for a directory of posts.
//!
//! Reads the posts under a site root and prints the card trees as JSON for
//! a renderer to consume.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
