//! CLI module for the triage router
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `route` - Route a batch of tickets and report the automation rate
//! - `score` - Show the priority score for a ticket shape
//! - `agents` - List the agent directory
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Route tickets from a JSON-lines file
//! triage route --input tickets.jsonl
//!
//! # Route from stdin with four workers, JSON output
//! cat tickets.jsonl | triage route --input - --workers 4 --json
//!
//! # Generate shell completions
//! triage completions bash > ~/.bash_completion.d/triage
//! ```

pub mod agents;
pub mod completions;
pub mod config;
pub mod output;
pub mod route;
pub mod score;

pub use completions::handle_completions;
pub use config::handle_config_init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Triage - support ticket router
#[derive(Parser, Debug)]
#[command(
    name = "triage",
    version,
    about = "Score support tickets and assign them to the best available agent"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Route a batch of tickets
    Route(RouteArgs),
    /// Compute the priority score for a ticket
    Score(ScoreArgs),
    /// List agents in the directory
    Agents(AgentsArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "triage.toml")]
    pub config: PathBuf,

    /// JSON-lines ticket file, or "-" for stdin
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output decisions and report as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Number of concurrent routing workers
    #[arg(short, long, default_value = "1")]
    pub workers: usize,

    /// Override the default per-agent capacity
    #[arg(long, env = "TRIAGE_MAX_IDEAL_LOAD")]
    pub max_ideal_load: Option<u32>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TRIAGE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Print Prometheus metrics after routing
    #[arg(long)]
    pub prometheus: bool,
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "triage.toml")]
    pub config: PathBuf,

    /// Ticket category
    #[arg(long)]
    pub category: String,

    /// Risk tag (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AgentsArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "triage.toml")]
    pub config: PathBuf,

    /// Only agents currently eligible for this category
    #[arg(long)]
    pub category: Option<String>,

    /// Filter by status (available, unavailable)
    #[arg(short, long)]
    pub status: Option<String>,

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
    #[arg(short, long, default_value = "triage.toml")]
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
