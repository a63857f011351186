//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use output::OutputFormat;

pub mod commands;
pub mod formatters;
pub mod output;

/// fitpick - pick the best-fitting 3- and 4-unit combinations under a size budget
#[derive(Parser, Debug)]
#[command(name = "fitpick")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// [DEPRECATED] Enable JSON output for machine consumption.
    /// Use --output-format=json or -m instead.
    #[arg(long, global = true, hide = true)]
    pub robot: bool,

    /// Output format (human, json, jsonl, plain, tsv)
    #[arg(long, short = 'O', global = true, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Enable machine-readable JSON output (shorthand for --output-format=json)
    #[arg(long, short = 'm', global = true)]
    pub machine: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/fitpick/config.toml + ./fitpick.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Get the effective output format.
    ///
    /// Priority order:
    /// 1. `--output-format` → Explicit format
    /// 2. `--machine` → JSON format (shorthand)
    /// 3. `--robot` → JSON format (deprecated)
    /// 4. Default → Human format
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        if let Some(fmt) = self.output_format {
            return fmt;
        }
        if self.machine || self.robot {
            return OutputFormat::Json;
        }
        OutputFormat::Human
    }

    /// True when logs and errors should be emitted as JSON.
    #[must_use]
    pub fn wants_json(&self) -> bool {
        matches!(
            self.output_format(),
            OutputFormat::Json | OutputFormat::Jsonl
        )
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find the top-K combinations for one target
    Search(commands::search::SearchArgs),

    /// Run many searches in parallel from a request file
    Batch(commands::batch::BatchArgs),

    /// Show per-type pool diagnostics for a target
    Pool(commands::pool::PoolArgs),

    /// Normalize raw type labels
    Normalize(commands::normalize::NormalizeArgs),

    /// Show effective configuration
    Config(commands::config::ConfigArgs),
}
