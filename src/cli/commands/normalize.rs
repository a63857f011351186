//! fitpick normalize - Show how raw type labels are read

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{OutputFormat, emit_json, emit_jsonl, robot_ok};
use crate::core::{UnitType, normalize_type};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Raw labels, e.g. `A` `b型` `D`
    #[arg(required = true)]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Normalized {
    pub label: String,
    pub unit_type: Option<UnitType>,
    pub searchable: bool,
}

#[must_use]
pub fn normalize_all(labels: &[String]) -> Vec<Normalized> {
    labels
        .iter()
        .map(|label| {
            let unit_type = normalize_type(label);
            Normalized {
                label: label.clone(),
                unit_type,
                searchable: unit_type.is_some_and(UnitType::is_searchable),
            }
        })
        .collect()
}

pub fn run(ctx: &AppContext, args: &NormalizeArgs) -> Result<()> {
    let rows = normalize_all(&args.labels);
    match ctx.output_format {
        OutputFormat::Json => emit_json(&robot_ok(&rows)),
        OutputFormat::Jsonl => emit_jsonl(&rows),
        OutputFormat::Tsv | OutputFormat::Plain => {
            for row in &rows {
                let unit_type = row.unit_type.map(|t| t.to_string()).unwrap_or_default();
                println!("{}\t{unit_type}\t{}", row.label, row.searchable);
            }
            Ok(())
        }
        OutputFormat::Human => {
            for row in &rows {
                let verdict = match row.unit_type {
                    Some(t) if row.searchable => t.to_string().green().to_string(),
                    Some(t) => format!("{} {}", t, "(not searchable)".dimmed()),
                    None => "unrecognized".red().to_string(),
                };
                println!("{:>12}  →  {verdict}", format!("{:?}", row.label));
            }
            Ok(())
        }
    }
}
