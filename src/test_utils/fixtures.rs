use std::path::PathBuf;

use serde_json::Value;
use tempfile::TempDir;

use crate::core::RawItem;
use crate::import::SourceSpec;

/// Isolated directory holding JSON source files.
pub struct SourceFixture {
    pub temp_dir: TempDir,
}

impl SourceFixture {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    #[must_use]
    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    /// Write raw text to `relative` and return the full path.
    pub fn write_file(&self, relative: &str, content: &str) -> std::io::Result<PathBuf> {
        let full_path = self.path(relative);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full_path, content)?;
        Ok(full_path)
    }

    /// Write `rows` as `<name>.json` and return it as a named source.
    pub fn write_source(&self, name: &str, rows: &Value) -> std::io::Result<SourceSpec> {
        let path = self.write_file(&format!("{name}.json"), &rows.to_string())?;
        Ok(SourceSpec {
            name: name.to_string(),
            path,
        })
    }
}

/// The small two-source data set used across the scenario tests:
/// `A: [10, 20]`, `B: [5]` (secondary), `C: [8, 30]`.
#[must_use]
pub fn scenario_items() -> Vec<RawItem> {
    vec![
        RawItem::new(10.0, "A", "primary"),
        RawItem::new(20.0, "A", "primary"),
        RawItem::new(5.0, "B", "secondary"),
        RawItem::new(8.0, "C", "primary"),
        RawItem::new(30.0, "C", "primary"),
    ]
}
