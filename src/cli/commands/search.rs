//! fitpick search - Top-K combinations for one target
//!
//! Loads the sources, runs one branch-and-bound search and prints (or
//! exports) the ranked combinations.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use colored::Colorize;

use super::{FilterArgs, SourceArgs, resolve_must_include};
use crate::app::AppContext;
use crate::cli::formatters::ResultsView;
use crate::cli::output::{OutputFormat, emit};
use crate::error::Result;
use crate::export::export_to_path;
use crate::import::load_warnings;
use crate::search::{SearchRequest, search_with_stats};

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Size budget every combination must stay within
    #[arg(long, short = 't')]
    pub target: f64,

    /// Source that must contribute at least one unit (default: search.must_include)
    #[arg(long)]
    pub must_include: Option<String>,

    /// Maximum number of results (default: search.k)
    #[arg(short = 'k', long = "top")]
    pub k: Option<usize>,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Also write the results as TSV to this path
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Include pool and enumeration counters in the output
    #[arg(long)]
    pub stats: bool,
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let request = build_request(ctx, args)?;
    let loaded = args.sources.load(ctx)?;

    let started = Instant::now();
    let outcome = search_with_stats(&loaded.items, &request)?;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    if let Some(path) = &args.export {
        export_to_path(path, &outcome.results)?;
        if ctx.output_format == OutputFormat::Human && !ctx.quiet {
            println!(
                "{} wrote {} rows to {}",
                "✓".green(),
                outcome.results.len(),
                path.display()
            );
        }
    }

    let view = ResultsView::new(request.target, request.must_include, request.k)
        .with_outcome(outcome, args.stats)
        .with_duration(elapsed_ms)
        .with_warnings(load_warnings(&loaded.reports));
    emit(&view, ctx.output_format);
    Ok(())
}

fn build_request(ctx: &AppContext, args: &SearchArgs) -> Result<SearchRequest> {
    let must_include = resolve_must_include(ctx, args.must_include.as_deref())?;
    let k = args.k.unwrap_or(ctx.config.search.k);
    let request = SearchRequest::new(args.target, must_include, k)
        .with_options(args.filters.options(ctx));
    request.validate()?;
    Ok(request)
}
