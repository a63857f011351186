//! Row sources: strict JSON ingestion with column mapping.
//!
//! A source file holds one JSON array of rows. Each row is either
//!
//! - an array, read positionally (`[85.5, "A型", "3-201", ...]`), or
//! - an object, read by key (`{"size": 85.5, "type": "A", "unit": "3-201"}`).
//!
//! Cells other than size and type are kept verbatim as opaque metadata. The
//! content is parsed as data only; nothing in it is ever evaluated.
//!
//! Rows are not validated here beyond their shape: a bad size or type is
//! carried through so the pool builder can drop and count it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::{RawItem, normalize_type_value};
use crate::error::{FitError, Result};

/// Where size and type live in a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    /// Object keys tried in order for the size cell.
    #[serde(default = "default_size_keys")]
    pub size_keys: Vec<String>,
    /// Object keys tried in order for the type cell.
    #[serde(default = "default_type_keys")]
    pub type_keys: Vec<String>,
    /// Position of the size cell in array rows.
    #[serde(default)]
    pub size_index: usize,
    /// Position of the type cell in array rows.
    #[serde(default = "default_type_index")]
    pub type_index: usize,
}

fn default_size_keys() -> Vec<String> {
    vec!["size".to_string(), "area".to_string()]
}

fn default_type_keys() -> Vec<String> {
    vec!["type".to_string(), "category".to_string()]
}

const fn default_type_index() -> usize {
    1
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            size_keys: default_size_keys(),
            type_keys: default_type_keys(),
            size_index: 0,
            type_index: default_type_index(),
        }
    }
}

/// A named source collection on disk, written `name=path` on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub name: String,
    pub path: PathBuf,
}

impl FromStr for SourceSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (name, path) = s
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=PATH, got '{s}'"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("source name is empty in '{s}'"));
        }
        if path.trim().is_empty() {
            return Err(format!("source path is empty in '{s}'"));
        }
        Ok(Self {
            name: name.to_string(),
            path: PathBuf::from(path.trim()),
        })
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.path.display())
    }
}

/// Per-source ingestion summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub source: String,
    pub rows: usize,
    pub loaded: usize,
    /// Rows that were neither arrays nor objects.
    pub skipped_rows: usize,
    /// Loaded rows whose size cell was missing or not numeric.
    pub unparsed_sizes: usize,
    /// Loaded rows whose type cell is not a recognizable label.
    pub unrecognized_types: usize,
}

impl LoadReport {
    /// Human-readable notes for every row class that will not be searched.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        let source = &self.source;
        [
            (self.skipped_rows, "are neither arrays nor objects"),
            (self.unparsed_sizes, "have no numeric size"),
            (self.unrecognized_types, "have an unrecognized type"),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, what)| format!("source '{source}': {count} rows {what}"))
        .collect()
    }
}

/// Load notes across all sources, in source order.
#[must_use]
pub fn load_warnings(reports: &[LoadReport]) -> Vec<String> {
    reports.iter().flat_map(LoadReport::warnings).collect()
}

/// Items read from one or more sources.
#[derive(Debug, Clone, Default)]
pub struct Loaded {
    pub items: Vec<RawItem>,
    pub reports: Vec<LoadReport>,
}

/// Parse the rows of one source from JSON text.
pub fn parse_items(
    json: &str,
    provenance: &str,
    columns: &ColumnMap,
    origin: &str,
) -> Result<(Vec<RawItem>, LoadReport)> {
    let value: Value =
        serde_json::from_str(json).map_err(|err| FitError::import(origin, err.to_string()))?;
    let Value::Array(rows) = value else {
        return Err(FitError::import(origin, "top level must be a JSON array of rows"));
    };

    let mut report = LoadReport {
        source: provenance.to_string(),
        rows: rows.len(),
        ..LoadReport::default()
    };
    let mut items = Vec::with_capacity(rows.len());

    for row in rows {
        let parsed = match row {
            Value::Array(cells) => Some(from_array(cells, columns)),
            Value::Object(fields) => Some(from_object(fields, columns)),
            _ => None,
        };
        let Some((size_cell, type_cell, metadata)) = parsed else {
            report.skipped_rows += 1;
            continue;
        };

        let size = size_cell.as_ref().and_then(parse_size);
        if size.is_none() {
            report.unparsed_sizes += 1;
        }
        let type_cell = type_cell.unwrap_or(Value::Null);
        if normalize_type_value(&type_cell).is_none() {
            report.unrecognized_types += 1;
        }

        items.push(RawItem {
            size: size.unwrap_or(f64::NAN),
            category_label: type_cell.as_str().unwrap_or_default().to_string(),
            provenance: provenance.to_string(),
            metadata,
        });
        report.loaded += 1;
    }

    if report.skipped_rows > 0 {
        warn!(
            source = provenance,
            skipped = report.skipped_rows,
            "skipped rows that are neither arrays nor objects"
        );
    }
    debug!(
        source = provenance,
        rows = report.rows,
        loaded = report.loaded,
        unparsed_sizes = report.unparsed_sizes,
        unrecognized_types = report.unrecognized_types,
        "parsed source"
    );
    Ok((items, report))
}

/// Read and parse one source file.
pub fn load_items(path: &Path, provenance: &str, columns: &ColumnMap) -> Result<Loaded> {
    if !path.exists() {
        return Err(FitError::NotFound(path.display().to_string()));
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|err| FitError::import(path.display(), err.to_string()))?;
    let (items, report) = parse_items(&raw, provenance, columns, &path.display().to_string())?;
    Ok(Loaded {
        items,
        reports: vec![report],
    })
}

/// Read every source, concatenating rows in source order.
pub fn load_sources(sources: &[SourceSpec], columns: &ColumnMap) -> Result<Loaded> {
    let mut loaded = Loaded::default();
    for spec in sources {
        let Loaded { items, reports } = load_items(&spec.path, &spec.name, columns)?;
        loaded.items.extend(items);
        loaded.reports.extend(reports);
    }
    Ok(loaded)
}

type RowParts = (Option<Value>, Option<Value>, Value);

fn from_array(cells: Vec<Value>, columns: &ColumnMap) -> RowParts {
    let mut size = None;
    let mut unit_type = None;
    let mut rest = Vec::new();
    for (idx, cell) in cells.into_iter().enumerate() {
        if idx == columns.size_index {
            size = Some(cell);
        } else if idx == columns.type_index {
            unit_type = Some(cell);
        } else {
            rest.push(cell);
        }
    }
    let metadata = if rest.is_empty() {
        Value::Null
    } else {
        Value::Array(rest)
    };
    (size, unit_type, metadata)
}

fn from_object(mut fields: Map<String, Value>, columns: &ColumnMap) -> RowParts {
    let size = take_first(&mut fields, &columns.size_keys);
    let unit_type = take_first(&mut fields, &columns.type_keys);
    let metadata = if fields.is_empty() {
        Value::Null
    } else {
        Value::Object(fields)
    };
    (size, unit_type, metadata)
}

fn take_first(fields: &mut Map<String, Value>, keys: &[String]) -> Option<Value> {
    keys.iter().find_map(|key| fields.remove(key))
}

/// Numbers and numeric strings are sizes; anything else is not.
fn parse_size(cell: &Value) -> Option<f64> {
    match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
