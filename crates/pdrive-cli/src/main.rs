//! pdrive CLI - Command-line interface for pdrive
//!
//! Provides commands for:
//! - Linking a ProtonDrive account (via the rclone protondrive backend)
//! - Checking the link status and environment (doctor)
//! - Browsing, syncing, mounting and unmounting the remote
//! - Viewing and editing pdrive's own configuration

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod prompt;

use commands::{
    auth::AuthCommand,
    completions::CompletionsCommand,
    config::ConfigCommand,
    doctor::DoctorCommand,
    ls::LsCommand,
    mount::{MountCommand, UnmountCommand},
    remote::RemoteCommand,
    sync::SyncCommand,
};
use output::{get_formatter, OutputFormat, OutputFormatter};
use pdrive_core::config::Config;
use pdrive_core::domain::newtypes::RemoteName;

#[derive(Debug, Parser)]
#[command(
    name = "pdrive",
    version,
    about = "ProtonDrive client for Linux, powered by rclone"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Link, unlink, and inspect the ProtonDrive account
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Check the external tool and mount prerequisites
    Doctor(DoctorCommand),
    /// Inspect the tool's configured remotes
    #[command(subcommand)]
    Remote(RemoteCommand),
    /// View and manage pdrive configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// List directories on the remote
    Ls(LsCommand),
    /// Sync a local directory to the remote
    Sync(SyncCommand),
    /// Mount the remote as a filesystem
    Mount(MountCommand),
    /// Unmount the remote filesystem
    Unmount(UnmountCommand),
    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Everything a command needs besides its own arguments
pub struct CliContext {
    pub format: OutputFormat,
    pub quiet: bool,
    pub config: Config,
}

impl CliContext {
    /// Formatter matching the chosen output format
    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        get_formatter(matches!(self.format, OutputFormat::Json), self.quiet)
    }

    /// The configured remote name, validated
    pub fn remote_name(&self) -> Result<RemoteName> {
        self.config
            .remote_name()
            .context("Invalid remote.name in configuration; run 'pdrive config validate'")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config first: its logging level is the default filter
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path);

    // Setup tracing: -v flags win over the configured level
    let filter = match cli.verbose {
        0 => config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = CliContext {
        format: if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        },
        quiet: cli.quiet,
        config,
    };

    match cli.command {
        Commands::Auth(cmd) => cmd.execute(&ctx).await,
        Commands::Doctor(cmd) => cmd.execute(&ctx).await,
        Commands::Remote(cmd) => cmd.execute(&ctx).await,
        Commands::Config(cmd) => cmd.execute(&ctx, &config_path).await,
        Commands::Ls(cmd) => cmd.execute(&ctx).await,
        Commands::Sync(cmd) => cmd.execute(&ctx).await,
        Commands::Mount(cmd) => cmd.execute(&ctx).await,
        Commands::Unmount(cmd) => cmd.execute(&ctx).await,
        Commands::Completions(cmd) => cmd.execute(&ctx).await,
    }
}
