//! Combination results formatter

use console::style;
use serde::Serialize;

use crate::cli::output::{Formattable, OutputFormat, robot_ok};
use crate::core::PoolStats;
use crate::export::{render_pick, render_tsv};
use crate::search::{SearchOutcome, SearchResult, SearchStats};

/// One search's results, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct ResultsView {
    pub target: f64,
    pub must_include: String,
    pub k: usize,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub results: Vec<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<SearchStats>,
    /// Load notes, carried in the envelope rather than in `data`.
    #[serde(skip)]
    pub warnings: Vec<String>,
}

impl ResultsView {
    pub fn new(target: f64, must_include: impl Into<String>, k: usize) -> Self {
        Self {
            target,
            must_include: must_include.into(),
            k,
            count: 0,
            duration_ms: None,
            results: Vec::new(),
            pool: None,
            stats: None,
            warnings: Vec::new(),
        }
    }

    /// Take results from an outcome; counters are kept only if `with_stats`.
    #[must_use]
    pub fn with_outcome(mut self, outcome: SearchOutcome, with_stats: bool) -> Self {
        self.count = outcome.results.len();
        self.results = outcome.results;
        if with_stats {
            self.pool = Some(outcome.pool);
            self.stats = Some(outcome.stats);
        }
        self
    }

    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    fn format_human(&self) -> String {
        let mut out = self.format_results();
        for warning in &self.warnings {
            out.push_str(&format!("{} {}\n", style("warning:").yellow(), warning));
        }
        out
    }

    fn format_results(&self) -> String {
        if self.results.is_empty() {
            let mut out = format!(
                "{} No combination fits target {} with a unit from '{}'\n\n",
                style("!").yellow(),
                style(self.target).cyan(),
                style(&self.must_include).cyan()
            );
            out.push_str("Try:\n");
            out.push_str("  - Raising --target\n");
            out.push_str("  - Relaxing --min-size/--max-size or --accept\n");
            out.push_str("  - Checking type coverage with `fitpick pool`\n");
            return out;
        }

        let mut out = format!(
            "{} of top {} for target {}",
            style(self.results.len().to_string()).bold(),
            self.k,
            style(self.target).cyan(),
        );
        if let Some(ms) = self.duration_ms {
            out.push_str(&format!(" in {ms}ms"));
        }
        out.push_str(":\n\n");

        for result in &self.results {
            out.push_str(&format!(
                "{}. {} {}\n",
                style(result.rank).dim(),
                style(result.sum).green().bold(),
                style(format!("(gap {}, {} units)", result.gap, result.item_count)).dim(),
            ));
            for pick in &result.picks {
                out.push_str(&format!(
                    "   {:>10}  {}\n",
                    pick.size,
                    style(&pick.label).cyan()
                ));
            }
            out.push('\n');
        }

        if let Some(stats) = &self.stats {
            out.push_str(&format!(
                "{}\n",
                style(format!(
                    "generated {} · rejected {} · duplicates {} · pruned {}",
                    stats.generated,
                    stats.rejected_total(),
                    stats.duplicates,
                    stats.pruned
                ))
                .dim()
            ));
        }
        out
    }

    fn format_plain(&self) -> String {
        self.results
            .iter()
            .map(|r| {
                let picks = r.picks.iter().map(render_pick).collect::<Vec<_>>();
                format!("{}: {} {}", r.rank, r.sum, picks.join(" "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_jsonl(&self) -> String {
        self.results
            .iter()
            .filter_map(|r| serde_json::to_string(r).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Formattable for ResultsView {
    fn format(&self, fmt: OutputFormat) -> String {
        match fmt {
            OutputFormat::Human => self.format_human(),
            OutputFormat::Json => {
                let response = robot_ok(self).with_warnings(self.warnings.clone());
                serde_json::to_string_pretty(&response).unwrap_or_default()
            }
            OutputFormat::Jsonl => self.format_jsonl(),
            OutputFormat::Plain => self.format_plain(),
            OutputFormat::Tsv => render_tsv(&self.results).trim_end().to_string(),
        }
    }
}
