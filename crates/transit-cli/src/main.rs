//! Transit CLI - replay message captures through the network projection

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use transit::ProjectionConfig;

mod commands;

#[derive(Parser)]
#[command(name = "transit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a JSON projection config (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed a JSON-lines message capture through the projection
    Replay {
        /// Capture file, one message envelope per line
        capture: PathBuf,

        /// Print the station board after the replay
        #[arg(short, long)]
        board: bool,
    },

    /// Show which topics map to which event category
    Topics,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => ProjectionConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ProjectionConfig::default(),
    };

    match cli.command {
        Commands::Replay { capture, board } => {
            commands::replay::execute(&config, capture, board)?;
        }
        Commands::Topics => {
            commands::topics::execute(&config);
        }
    }

    Ok(())
}
