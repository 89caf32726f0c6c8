//! Gigbook CLI - Command-line interface for Gigbook
//!
//! Provides commands for:
//! - Listing booking conflicts across a performer's calendar
//! - Inspecting the conflicts of a single booking
//! - Resolving and unresolving conflicting pairs
//! - Viewing and validating configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    completions::CompletionsCommand, config::ConfigCommand, conflicts::ConflictsCommand,
    CommandContext,
};
use gigbook_core::{config::Config, domain::UserId};
use output::{get_formatter, OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "gigbook", version, about = "Booking conflict checker for performers")]
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

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// User whose calendar to inspect (defaults to conflicts.default_user)
    #[arg(short, long, global = true)]
    user: Option<UserId>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect and resolve booking conflicts
    #[command(subcommand)]
    Conflicts(ConflictsCommand),
    /// View and manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let load_result = Config::load(&config_path);

    let config = match &load_result {
        Ok(config) => config.clone(),
        Err(_) => Config::default(),
    };

    init_tracing(&cli, &config);

    if let Err(e) = &load_result {
        if config_path.exists() {
            tracing::warn!(path = %config_path.display(), error = %e, "Ignoring unreadable config file");
        } else {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
        }
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    let ctx = CommandContext {
        format,
        config,
        config_path,
        user: cli.user,
    };

    let result = match &cli.command {
        Commands::Conflicts(cmd) => cmd.execute(&ctx).await,
        Commands::Config(cmd) => cmd.execute(&ctx).await,
        Commands::Completions(cmd) => cmd.execute(&ctx).await,
    };

    if let Err(e) = result {
        get_formatter(cli.json).error(&format!("{e:#}"));
        std::process::exit(1);
    }

    Ok(())
}

/// Installs the tracing subscriber
///
/// `RUST_LOG` wins; otherwise `-v` raises the configured level.
fn init_tracing(cli: &Cli, config: &Config) {
    let level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if cli.log_json {
        builder.json().init();
    } else {
        builder.with_target(false).init();
    }
}
