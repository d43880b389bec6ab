//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod init;
mod presets;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings, LoadOptions};

#[derive(Parser)]
#[command(name = "codex")]
#[command(about = "Customer, door-access, IoT and document-analysis backend")]
#[command(version)]
pub struct Cli {
    /// Data directory (database, uploads, codex.toml)
    #[arg(long, global = true, env = "CODEX_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Config file path (overrides {data_dir}/codex.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and database
    Init,

    /// Start the API server
    Serve {
        /// Address to bind: port, host, or host:port
        #[arg(default_value = "127.0.0.1:8000")]
        bind: String,
    },

    /// Extract a local file and analyze it without storing anything
    Analyze {
        /// File to analyze (.pdf, .doc, .docx or .txt)
        file: PathBuf,
        /// Instruction sent ahead of the extracted text
        #[arg(short, long, default_value = "Summarize this document.")]
        prompt: String,
        /// Analysis preset (cv, tender, contract)
        #[arg(short = 't', long = "type")]
        analysis_type: Option<String>,
    },

    /// List built-in analysis presets
    Presets,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        data_dir: cli.data_dir,
        config: cli.config,
    };
    let settings = load_settings(&options)?;

    match cli.command {
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Serve { bind } => serve::cmd_serve(&settings, &bind).await,
        Commands::Analyze {
            file,
            prompt,
            analysis_type,
        } => analyze::cmd_analyze(&settings, &file, &prompt, analysis_type.as_deref()).await,
        Commands::Presets => {
            presets::cmd_presets();
            Ok(())
        }
    }
}
