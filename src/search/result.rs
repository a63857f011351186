//! External result shape.
//!
//! Kept combinations are rendered into owned, serializable records: picks in
//! type order, sums and gaps rounded to absorb float summation noise.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::topk::Candidate;
use crate::core::{PoolItem, UnitType};

pub use crate::core::SUM_PRECISION;

/// One picked unit in a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub size: f64,
    pub unit_type: UnitType,
    /// Type label as it appeared in the source row.
    pub category_label: String,
    pub provenance: String,
    /// `"<TYPE>/<provenance>"`, e.g. `A/primary`.
    pub label: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub metadata: Value,
}

impl Pick {
    fn from_pool_item(item: &PoolItem<'_>) -> Self {
        Self {
            size: item.size,
            unit_type: item.unit_type,
            category_label: item.raw.category_label.clone(),
            provenance: item.raw.provenance.clone(),
            label: format!("{}/{}", item.unit_type, item.raw.provenance),
            metadata: item.raw.metadata.clone(),
        }
    }
}

/// A ranked combination as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// 1-based position in the result list.
    pub rank: usize,
    pub item_count: usize,
    pub sum: f64,
    pub target: f64,
    pub gap: f64,
    pub picks: Vec<Pick>,
}

/// Round `value` to `places` decimals.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    let rounded = (value * scale).round() / scale;
    // Normalize -0.0 from tiny negative noise.
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Render kept candidates, already ordered by sum descending.
#[must_use]
pub fn format_results(candidates: Vec<Candidate<'_>>, target: f64) -> Vec<SearchResult> {
    candidates
        .into_iter()
        .enumerate()
        .map(|(idx, candidate)| {
            let mut picks = candidate.picks;
            picks.sort_by(|a, b| {
                a.unit_type
                    .cmp(&b.unit_type)
                    .then_with(|| a.size.total_cmp(&b.size))
                    .then_with(|| a.source_index.cmp(&b.source_index))
            });
            SearchResult {
                rank: idx + 1,
                item_count: picks.len(),
                sum: round_to(candidate.sum, SUM_PRECISION),
                target,
                gap: round_to(target - candidate.sum, SUM_PRECISION),
                picks: picks.iter().map(Pick::from_pool_item).collect(),
            }
        })
        .collect()
}
