//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// dbpatch - apply new SQL change files to a database, once and in order
#[derive(Parser, Debug)]
#[command(name = "dbpatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the change files (and, by default, config.yaml)
    #[arg(short, long, global = true, default_value = ".")]
    pub dir: PathBuf,

    /// Override config file path
    #[arg(short, long, global = true, env = "DBPATCH_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply every change file that has not been applied yet
    Apply(ApplyArgs),

    /// Show applied and pending change files
    Status(StatusArgs),

    /// Record change files as applied without running them
    Mark(MarkArgs),
}

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Show what would be applied without running or recording anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Human-readable listing
    Table,
    /// JSON output
    Json,
}

/// Arguments for the mark command
#[derive(Args, Debug)]
pub struct MarkArgs {
    /// Change file names to record as applied
    #[arg(required = true)]
    pub files: Vec<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
