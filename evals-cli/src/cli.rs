//! Command-line argument definitions

use clap::{Parser, Subcommand};

use crate::commands::{
    config::ConfigCommands, evals::EvalsCommands, output_items::OutputItemsCommands,
    runs::RunsCommands,
};
use crate::output::OutputFormat;

/// Manage OpenAI evals, their runs and per-sample output items
#[derive(Debug, Parser)]
#[command(name = "evals", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// API base URL
    #[arg(long, global = true, env = "OPENAI_BASE_URL")]
    pub api_url: Option<String>,

    /// API key, sent as a bearer token
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Organization ID
    #[arg(long, global = true, env = "OPENAI_ORGANIZATION_ID")]
    pub organization: Option<String>,

    /// Project ID
    #[arg(long, global = true, env = "OPENAI_PROJECT_ID")]
    pub project: Option<String>,

    /// Configuration profile to use
    #[arg(short, long, global = true, env = "EVALS_PROFILE")]
    pub profile: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Log HTTP traffic to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create, inspect and delete evals
    Evals(EvalsCommands),

    /// Start, inspect and cancel eval runs
    Runs(RunsCommands),

    /// Inspect per-sample results of a run
    OutputItems(OutputItemsCommands),

    /// Manage CLI configuration and profiles
    Config(ConfigCommands),
}
