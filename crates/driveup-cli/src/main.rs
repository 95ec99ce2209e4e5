//! driveup CLI - Command-line interface for updating Google Drive files
//!
//! Provides commands for:
//! - Updating a file's metadata, content and parent folders
//! - Viewing and validating configuration
//! - Generating shell completions

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use driveup_core::config::Config;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod local;
mod output;
mod sink;

use commands::{completions::CompletionsCommand, config::ConfigCommand, update::UpdateCommand};
use output::{get_formatter, OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "driveup", version, about = "Update Google Drive files from the command line")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Update a file's metadata, content and parents
    Update(UpdateCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path);

    // Setup tracing
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(cli.verbose, &config.logging.level)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!(config_path = %config_path.display(), "Loaded configuration");

    let format = OutputFormat::from_flags(cli.json, cli.quiet);

    if let Err(e) = run(cli.command, &config, &config_path, format).await {
        let formatter = get_formatter(format);
        formatter.error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(
    command: Commands,
    config: &Config,
    config_path: &std::path::Path,
    format: OutputFormat,
) -> Result<()> {
    match command {
        Commands::Update(cmd) => cmd.execute(config, format).await,
        Commands::Config(cmd) => cmd.execute(config_path, format),
        Commands::Completions(cmd) => cmd.execute(),
    }
}

/// Filter directive from the `-v` count, falling back to the configured level
fn log_filter(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}
