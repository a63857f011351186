//! Tabular export of search results.
//!
//! One header line, then one tab-separated row per result. Picks share a
//! single column, each rendered `size(TYPE/source)` and joined by spaces.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::search::{Pick, SearchResult};

/// Column names of the export, in order.
pub const TSV_HEADERS: [&str; 6] = ["rank", "sum", "target", "gap", "item_count", "picks"];

/// Render one pick as `size(TYPE/source)`.
#[must_use]
pub fn render_pick(pick: &Pick) -> String {
    format!("{}({})", pick.size, sanitize(&pick.label))
}

/// Render the cells of one result row.
#[must_use]
pub fn render_row(result: &SearchResult) -> Vec<String> {
    let picks = result
        .picks
        .iter()
        .map(render_pick)
        .collect::<Vec<_>>()
        .join(" ");
    vec![
        result.rank.to_string(),
        result.sum.to_string(),
        result.target.to_string(),
        result.gap.to_string(),
        result.item_count.to_string(),
        picks,
    ]
}

/// Render the whole table, header included, with a trailing newline.
#[must_use]
pub fn render_tsv(results: &[SearchResult]) -> String {
    let mut out = TSV_HEADERS.join("\t");
    out.push('\n');
    for result in results {
        out.push_str(&render_row(result).join("\t"));
        out.push('\n');
    }
    out
}

/// Write the table to any writer.
pub fn write_tsv<W: Write>(mut writer: W, results: &[SearchResult]) -> Result<()> {
    writer.write_all(render_tsv(results).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Write the table to `path`, replacing any existing file.
pub fn export_to_path(path: &Path, results: &[SearchResult]) -> Result<()> {
    let file = File::create(path)?;
    write_tsv(BufWriter::new(file), results)?;
    info!(path = %path.display(), rows = results.len(), "exported results");
    Ok(())
}

/// Tabs and newlines would break the row layout.
fn sanitize(text: &str) -> String {
    text.replace(['\t', '\n', '\r'], " ")
}
