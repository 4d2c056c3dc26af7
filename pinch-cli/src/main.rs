// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Pinch CLI - Claude usage quota monitoring from the command line.
//!
//! # Examples
//!
//! ```bash
//! # One-shot poll of the usage endpoint
//! pinch usage
//!
//! # JSON output
//! pinch usage --format json
//!
//! # Continuous monitoring at the configured interval
//! pinch watch
//!
//! # Token health and connection test
//! pinch check
//!
//! # Show or change the poll interval
//! pinch config
//! pinch config --set-interval 60
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{check, config, usage, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// Pinch CLI - Claude usage quota monitoring.
#[derive(Parser)]
#[command(name = "pinch")]
#[command(about = "Claude usage quota monitoring CLI")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'usage' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch current usage once (default if no command specified).
    #[command(visible_alias = "u")]
    Usage,

    /// Poll continuously and print each snapshot as it is published.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// Check token health and test the connection.
    Check,

    /// Show or change configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("pinch=debug,info")
    } else {
        EnvFilter::new("pinch=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Usage) | None => usage::run(&cli),
        Some(Commands::Watch(args)) => watch::run(args, &cli),
        Some(Commands::Check) => check::run(&cli),
        Some(Commands::Config(args)) => config::run(args, &cli),
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }

    Ok(())
}
