pub mod commands;
pub mod render;

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "medibot")]
#[command(author = "MediBot Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Ask questions about a PDF document using Gemini", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat about a PDF document
    #[command(long_about = "Start an interactive chat about a PDF document.\n\n\
        Inside the chat, any line is a question about the loaded document.\n\
        Commands: /open <path>, /reset, /history, /status, /help, /quit.\n\n\
        The Gemini API key is read from the config file or from the API_KEY,\n\
        GEMINI_API_KEY or GOOGLE_API_KEY environment variables.")]
    Chat {
        /// PDF document to load on start
        pdf: Option<PathBuf>,

        /// Gemini model name (e.g. gemini-2.5-flash)
        #[arg(short, long, env = "MEDIBOT_MODEL")]
        model: Option<String>,
    },

    /// Answer a single question about a PDF document
    Ask {
        /// PDF document to read
        #[arg(required = true)]
        pdf: PathBuf,

        /// Question about the document
        #[arg(required = true)]
        question: String,

        /// Gemini model name (e.g. gemini-2.5-flash)
        #[arg(short, long, env = "MEDIBOT_MODEL")]
        model: Option<String>,
    },

    /// Print the text extracted from a PDF document
    Extract {
        /// PDF document to read
        #[arg(required = true)]
        pdf: PathBuf,

        /// Only print the first N characters, as sent to the model (N >= 1)
        #[arg(long)]
        max_chars: Option<NonZeroUsize>,
    },

    /// Write a default configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long, default_value = "false")]
        force: bool,
    },
}
