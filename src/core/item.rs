//! Item types shared by ingestion, the search core and output.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::category::UnitType;

/// One row as delivered by a row source.
///
/// Nothing here is validated yet; the pool builder decides what is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    /// Unit size. May be non-finite or non-positive in noisy data.
    pub size: f64,
    /// Type label exactly as found in the source (`"A"`, `"b型"`, ...).
    pub category_label: String,
    /// Tag of the collection this row came from.
    pub provenance: String,
    /// Opaque display fields, passed through untouched.
    #[serde(default)]
    pub metadata: Value,
}

impl RawItem {
    pub fn new(
        size: f64,
        category_label: impl Into<String>,
        provenance: impl Into<String>,
    ) -> Self {
        Self {
            size,
            category_label: category_label.into(),
            provenance: provenance.into(),
            metadata: Value::Null,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A validated, typed view of a [`RawItem`] inside a candidate pool.
#[derive(Debug, Clone, Copy)]
pub struct PoolItem<'a> {
    pub size: f64,
    pub unit_type: UnitType,
    /// Position of the row in the original input slice.
    pub source_index: usize,
    pub raw: &'a RawItem,
}

impl<'a> PoolItem<'a> {
    #[must_use]
    pub fn provenance(&self) -> &'a str {
        self.raw.provenance.as_str()
    }
}
