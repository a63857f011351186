//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use clap::Args;
use tracing::warn;

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::{FitError, Result};
use crate::import::{Loaded, SourceSpec, load_sources};
use crate::search::{AntiDominance, SearchOptions};

pub mod batch;
pub mod config;
pub mod normalize;
pub mod pool;
pub mod search;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Search(args) => search::run(ctx, args),
        Commands::Batch(args) => batch::run(ctx, args),
        Commands::Pool(args) => pool::run(ctx, args),
        Commands::Normalize(args) => normalize::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
    }
}

/// Where candidate rows come from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Source collection as NAME=PATH (JSON array of rows); repeatable
    #[arg(long = "source", short = 's', value_name = "NAME=PATH", required = true)]
    pub sources: Vec<SourceSpec>,
}

impl SourceArgs {
    /// Load every source using the configured column mapping.
    pub fn load(&self, ctx: &AppContext) -> Result<Loaded> {
        let loaded = load_sources(&self.sources, &ctx.config.columns)?;
        for report in &loaded.reports {
            if report.skipped_rows > 0 {
                warn!(
                    source = %report.source,
                    skipped = report.skipped_rows,
                    "source contains rows that are neither arrays nor objects"
                );
            }
        }
        Ok(loaded)
    }
}

/// Pool filters shared by `search`, `batch` and `pool`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Smallest admissible unit size (inclusive)
    #[arg(long)]
    pub min_size: Option<f64>,

    /// Largest admissible unit size (inclusive)
    #[arg(long)]
    pub max_size: Option<f64>,

    /// Only admit units from these sources (comma-separated; default: all)
    #[arg(long = "accept", value_delimiter = ',')]
    pub accepted_sources: Vec<String>,

    /// Reject combos with one unit above this size while the rest are small
    #[arg(long, requires = "others_threshold")]
    pub dominant_threshold: Option<f64>,

    /// Upper size (exclusive) for the remaining units of a dominated combo
    #[arg(long, requires = "dominant_threshold")]
    pub others_threshold: Option<f64>,
}

impl FilterArgs {
    /// Configured search options with these flags layered on top.
    #[must_use]
    pub fn options(&self, ctx: &AppContext) -> SearchOptions {
        let mut options = ctx.config.search.options();
        if self.min_size.is_some() {
            options.min_size = self.min_size;
        }
        if self.max_size.is_some() {
            options.max_size = self.max_size;
        }
        if !self.accepted_sources.is_empty() {
            options.accepted_sources.clone_from(&self.accepted_sources);
        }
        if let (Some(dominant), Some(others)) = (self.dominant_threshold, self.others_threshold) {
            options.anti_dominance = Some(AntiDominance::new(dominant, others));
        }
        options
    }
}

/// Flag value, else configured value, else a missing-config error.
pub(crate) fn resolve_must_include(ctx: &AppContext, flag: Option<&str>) -> Result<String> {
    flag.map(ToString::to_string)
        .or_else(|| ctx.config.search.must_include.clone())
        .ok_or_else(|| FitError::MissingConfig("search.must_include".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::config::Config;

    #[test]
    fn filter_flags_override_config() {
        let mut config = Config::default();
        config.search.min_size = Some(20.0);
        config.search.accepted_sources = vec!["primary".to_string()];
        let ctx = AppContext::with_config(config, OutputFormat::Human);

        let args = FilterArgs {
            max_size: Some(120.0),
            dominant_threshold: Some(100.0),
            others_threshold: Some(70.0),
            ..FilterArgs::default()
        };
        let options = args.options(&ctx);
        assert_eq!(options.min_size, Some(20.0));
        assert_eq!(options.max_size, Some(120.0));
        assert_eq!(options.accepted_sources, vec!["primary"]);
        assert!(options.anti_dominance.is_some());
    }

    #[test]
    fn must_include_falls_back_to_config() {
        let mut config = Config::default();
        let ctx = AppContext::with_config(config.clone(), OutputFormat::Human);
        let err = resolve_must_include(&ctx, None).unwrap_err();
        assert!(matches!(err, FitError::MissingConfig(_)));
        assert_eq!(resolve_must_include(&ctx, Some("b")).unwrap(), "b");

        config.search.must_include = Some("secondary".to_string());
        let ctx = AppContext::with_config(config, OutputFormat::Human);
        assert_eq!(resolve_must_include(&ctx, None).unwrap(), "secondary");
    }
}
