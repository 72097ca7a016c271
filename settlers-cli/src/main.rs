//! Settlers CLI - Command-line interface
//!
//! Commands:
//! - replay: Feed a recorded message log through a client session
//! - board: Build and inspect the drawable board for a map payload
//! - serve: Start the viewer server, optionally with a log preloaded

mod board;
mod replay;
mod serve;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use settlers_client::ClientConfig;

#[derive(Parser)]
#[command(name = "settlers")]
#[command(about = "Settlers board client tools")]
struct Cli {
    /// Client configuration JSON file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded message log
    Replay(replay::ReplayArgs),
    /// Build the board for a start-game or hydrate payload
    Board(board::BoardArgs),
    /// Start the viewer server
    Serve(serve::ServeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    init_logging(&config.log_filter);

    match cli.command {
        Commands::Replay(args) => replay::run(args, config),
        Commands::Board(args) => board::run(args, config),
        Commands::Serve(args) => serve::run(args, config),
    }
}

/// `RUST_LOG` wins over the configured filter
fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
