//! fitpick pool - Pool diagnostics for a target
//!
//! Shows how many units of each type survive filtering, their size range,
//! why the rest were dropped, and whether every type is covered.

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use super::{FilterArgs, SourceArgs};
use crate::app::AppContext;
use crate::cli::output::{HumanLayout, OutputFormat, emit_human, emit_json, robot_ok};
use crate::core::{CandidatePool, PoolFilter, PoolStats, UnitType};
use crate::error::{FitError, Result};
use crate::import::{LoadReport, load_warnings};

#[derive(Args, Debug)]
pub struct PoolArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Size budget used to drop oversized units
    #[arg(long, short = 't')]
    pub target: f64,

    #[command(flatten)]
    pub filters: FilterArgs,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub unit_type: UnitType,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smallest: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largest: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolReport {
    pub target: f64,
    pub coverage: bool,
    pub groups: Vec<GroupSummary>,
    pub stats: PoolStats,
    pub sources: Vec<LoadReport>,
}

pub fn run(ctx: &AppContext, args: &PoolArgs) -> Result<()> {
    if !args.target.is_finite() || args.target <= 0.0 {
        return Err(FitError::InvalidInput(format!(
            "target must be a finite positive number (got {})",
            args.target
        )));
    }
    let loaded = args.sources.load(ctx)?;
    let options = args.filters.options(ctx);
    let filter = PoolFilter {
        target: args.target,
        accepted_sources: &options.accepted_sources,
        min_size: options.min_size,
        max_size: options.max_size,
    };
    let pool = CandidatePool::build(&loaded.items, &filter);
    let report = summarize(&pool, args.target, loaded.reports);

    match ctx.output_format {
        OutputFormat::Json | OutputFormat::Jsonl => {
            let warnings = load_warnings(&report.sources);
            emit_json(&robot_ok(&report).with_warnings(warnings))
        }
        OutputFormat::Tsv => {
            println!("type\tcount\tsmallest\tlargest");
            for group in &report.groups {
                println!(
                    "{}\t{}\t{}\t{}",
                    group.unit_type,
                    group.count,
                    group.smallest.map(|s| s.to_string()).unwrap_or_default(),
                    group.largest.map(|s| s.to_string()).unwrap_or_default()
                );
            }
            Ok(())
        }
        OutputFormat::Human | OutputFormat::Plain => {
            emit_human(human_layout(&report));
            Ok(())
        }
    }
}

/// Per-type counts and size ranges of a built pool.
#[must_use]
pub fn summarize(pool: &CandidatePool<'_>, target: f64, sources: Vec<LoadReport>) -> PoolReport {
    let groups = UnitType::SEARCHABLE
        .iter()
        .map(|&unit_type| {
            let group = pool.group(unit_type);
            GroupSummary {
                unit_type,
                count: group.len(),
                smallest: group.first().map(|item| item.size),
                largest: group.last().map(|item| item.size),
            }
        })
        .collect();
    PoolReport {
        target,
        coverage: pool.has_coverage(),
        groups,
        stats: *pool.stats(),
        sources,
    }
}

fn human_layout(report: &PoolReport) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout.title(&format!("Pool for target {}", report.target));

    layout.section("Types");
    for group in &report.groups {
        let range = match (group.smallest, group.largest) {
            (Some(lo), Some(hi)) => format!("{lo} .. {hi}"),
            _ => "-".to_string(),
        };
        layout.kv(&group.unit_type.to_string(), &format!("{:>6}  {range}", group.count));
    }
    let coverage = if report.coverage {
        "yes".green().to_string()
    } else {
        "no".red().to_string()
    };
    layout.kv("Coverage", &coverage).blank();

    let stats = &report.stats;
    layout.section("Dropped rows");
    layout
        .kv("Invalid size", &stats.invalid_size.to_string())
        .kv("Unrecognized type", &stats.unrecognized_type.to_string())
        .kv("Unsearchable type", &stats.unsearchable_type.to_string())
        .kv("Rejected source", &stats.rejected_source.to_string())
        .kv("Out of bounds", &stats.out_of_bounds.to_string())
        .kv("Over target", &stats.over_target.to_string())
        .blank();

    layout.section("Sources");
    for source in &report.sources {
        layout.bullet(&format!(
            "{}: {} rows, {} loaded, {} skipped",
            source.source, source.rows, source.loaded, source.skipped_rows
        ));
    }
    layout
}
