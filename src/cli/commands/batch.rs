//! fitpick batch - Many searches over one snapshot, in parallel
//!
//! The request file is a JSON array. Each entry needs a `target`; every
//! other field falls back to configuration:
//!
//! ```json
//! [{"target": 300}, {"target": 280, "k": 3, "must_include": "secondary"}]
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use colored::Colorize;
use serde::Deserialize;

use super::{FilterArgs, SourceArgs, resolve_must_include};
use crate::app::AppContext;
use crate::cli::output::{HumanLayout, OutputFormat, emit_human, emit_json, emit_jsonl, robot_ok, robot_partial};
use crate::core::RawItem;
use crate::dispatch::{BatchReport, Dispatcher, JobOutcome};
use crate::error::{FitError, Result};
use crate::export::render_tsv;
use crate::import::load_warnings;
use crate::search::{SearchOptions, SearchRequest};

#[derive(Args, Debug)]
pub struct BatchArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// JSON file holding an array of requests
    #[arg(long, short = 'r', value_name = "PATH")]
    pub requests: PathBuf,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Worker threads (default: dispatch.workers)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Bounded queue length (default: dispatch.queue_capacity)
    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// Deadline for the whole batch in milliseconds (default: dispatch.timeout_ms)
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

/// One entry of the request file.
#[derive(Debug, Clone, Deserialize)]
struct BatchEntry {
    target: f64,
    #[serde(default)]
    must_include: Option<String>,
    #[serde(default)]
    k: Option<usize>,
    #[serde(default)]
    options: Option<SearchOptions>,
}

pub fn run(ctx: &AppContext, args: &BatchArgs) -> Result<()> {
    let requests = read_requests(ctx, args)?;
    let loaded = args.sources.load(ctx)?;
    let warnings = load_warnings(&loaded.reports);
    let items: Arc<[RawItem]> = loaded.items.into();

    let mut options = ctx.config.dispatch.options();
    if let Some(workers) = args.workers {
        options.workers = workers;
    }
    if let Some(capacity) = args.queue_capacity {
        options.queue_capacity = capacity;
    }
    if let Some(ms) = args.timeout_ms {
        options.timeout = Some(Duration::from_millis(ms));
    }

    let timeout = options.timeout;
    let dispatcher = Dispatcher::start(options)?;
    let report = dispatcher.run_batch(&items, requests)?;
    dispatcher.shutdown();

    if !report.outcomes.is_empty() && report.timed_out == report.outcomes.len() {
        let ms = timeout.map_or(0, |t| t.as_millis());
        return Err(FitError::Timeout(format!(
            "none of {} requests finished within {ms}ms",
            report.outcomes.len()
        )));
    }
    emit_report(ctx, &report, warnings)
}

fn read_requests(ctx: &AppContext, args: &BatchArgs) -> Result<Vec<SearchRequest>> {
    let path = &args.requests;
    if !path.exists() {
        return Err(FitError::NotFound(path.display().to_string()));
    }
    let raw = std::fs::read_to_string(path)?;
    let entries: Vec<BatchEntry> = serde_json::from_str(&raw)
        .map_err(|err| FitError::import(path.display(), err.to_string()))?;

    let defaults = args.filters.options(ctx);
    entries
        .into_iter()
        .map(|entry| {
            Ok(SearchRequest {
                target: entry.target,
                must_include: resolve_must_include(ctx, entry.must_include.as_deref())?,
                k: entry.k.unwrap_or(ctx.config.search.k),
                options: entry.options.unwrap_or_else(|| defaults.clone()),
            })
        })
        .collect()
}

fn emit_report(ctx: &AppContext, report: &BatchReport, warnings: Vec<String>) -> Result<()> {
    match ctx.output_format {
        OutputFormat::Json => {
            let response = if report.completed == report.outcomes.len() {
                robot_ok(report)
            } else {
                robot_partial(report, report.completed, report.failed, report.timed_out)
            };
            emit_json(&response.with_warnings(warnings))
        }
        OutputFormat::Jsonl => emit_jsonl(&report.outcomes),
        OutputFormat::Tsv => {
            for (idx, outcome) in report.outcomes.iter().enumerate() {
                if let JobOutcome::Completed { outcome } = outcome {
                    println!("# request {}", idx + 1);
                    print!("{}", render_tsv(&outcome.results));
                }
            }
            Ok(())
        }
        OutputFormat::Human | OutputFormat::Plain => {
            emit_human(human_layout(report));
            Ok(())
        }
    }
}

fn human_layout(report: &BatchReport) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout.title("Batch");
    layout
        .kv("Requests", &report.outcomes.len().to_string())
        .kv("Completed", &report.completed.to_string())
        .kv("Failed", &report.failed.to_string())
        .kv("Timed out", &report.timed_out.to_string())
        .kv("Elapsed", &format!("{}ms", report.elapsed_ms))
        .blank();

    for (idx, outcome) in report.outcomes.iter().enumerate() {
        let line = match outcome {
            JobOutcome::Completed { outcome } => match outcome.results.first() {
                Some(best) => format!(
                    "#{} {} results, best sum {} (gap {})",
                    idx + 1,
                    outcome.results.len(),
                    best.sum,
                    best.gap
                ),
                None => format!("#{} no combination", idx + 1),
            },
            JobOutcome::Failed { error } => {
                format!("#{} {} {}", idx + 1, "failed:".red(), error.message)
            }
            JobOutcome::TimedOut => format!("#{} {}", idx + 1, "timed out".yellow()),
        };
        layout.bullet(&line);
    }
    layout
}
