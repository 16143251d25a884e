mod cli;
mod config;
mod error;
mod llm;
mod parser;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing - only show warnings by default, use RUST_LOG=debug for more detail
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat { pdf, model } => {
            cli::commands::chat::run(pdf, model).await?;
        }
        Commands::Ask {
            pdf,
            question,
            model,
        } => {
            cli::commands::ask::run(pdf, question, model).await?;
        }
        Commands::Extract { pdf, max_chars } => {
            cli::commands::extract::run(pdf, max_chars).await?;
        }
        Commands::Init { force } => {
            cli::commands::init::run(force).await?;
        }
    }

    Ok(())
}
