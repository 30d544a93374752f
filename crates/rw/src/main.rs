//! RW CLI - Sidebar navigation engine.
//!
//! Provides commands for:
//! - `nav inspect`: Show breadcrumbs, previous/next links and the visible sidebar
//! - `nav replay`: Replay a timestamped event script against the engine

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::NavCommand;
use output::Output;

const VERBOSE_FILTER: &str = "debug";
const DEFAULT_FILTER: &str = "warn";

/// `RUST_LOG` if set and valid, otherwise [`DEFAULT_FILTER`].
fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// RW - Sidebar navigation engine.
#[derive(Parser)]
#[command(name = "rw", version, about)]
struct Cli {
    /// Enable verbose output (engine state transitions).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sidebar navigation commands.
    #[command(subcommand)]
    Nav(NavCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG level (engine transitions), otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        default_filter()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Nav(cmd) => cmd.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
