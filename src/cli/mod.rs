//! CLI module for page-monitor
//!
//! # Commands
//!
//! - `watch` - Monitor targets until interrupted
//! - `check` - Probe a URL once and report whether it is up
//! - `status` - Show per-target status from a running monitor
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Monitor a single page with default policy
//! page-monitor watch --url http://localhost:8080
//!
//! # One-shot check, exit code 1 when down
//! URL=https://example.com page-monitor check
//!
//! # Query a running monitor
//! page-monitor status --endpoint http://localhost:2112
//! ```

pub mod check;
pub mod completions;
pub mod config;
pub mod output;
pub mod status;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// page-monitor - HTTP availability monitor
#[derive(Parser, Debug)]
#[command(
    name = "page-monitor",
    version,
    about = "Probe web pages, track availability and alert on outages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Monitor configured targets and serve metrics
    Watch(WatchArgs),
    /// Probe a URL once
    Check(CheckArgs),
    /// Show target status from a running monitor
    Status(StatusArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "page-monitor.toml")]
    pub config: PathBuf,

    /// Monitor only this URL (replaces configured targets)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Override the poll interval of every target, in seconds
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Override metrics port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Do not start the metrics endpoint
    #[arg(long)]
    pub no_metrics: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// URL to probe
    #[arg(env = "URL")]
    pub url: String,

    /// Request timeout in seconds
    #[arg(short, long, default_value = "5")]
    pub timeout: u64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Base URL of a running monitor's metrics endpoint
    #[arg(short, long, default_value = "http://localhost:2112")]
    pub endpoint: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "page-monitor.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
