//! Candidate pool construction.
//!
//! Raw rows are validated, typed and bucketed into three size-ascending groups
//! (A, B, C). Rows that cannot take part in any combination are dropped and
//! counted, never reported as errors.

use serde::Serialize;
use tracing::debug;

use super::bisect::fits;
use super::category::{UnitType, normalize_type};
use super::item::{PoolItem, RawItem};

/// Row-level eligibility rules applied while building a pool.
#[derive(Debug, Clone, Default)]
pub struct PoolFilter<'f> {
    /// Upper limit for a single item: the search target.
    pub target: f64,
    /// Accepted provenance tags. Empty accepts every tag.
    pub accepted_sources: &'f [String],
    /// Inclusive lower size bound.
    pub min_size: Option<f64>,
    /// Inclusive upper size bound.
    pub max_size: Option<f64>,
}

impl PoolFilter<'_> {
    fn source_accepted(&self, provenance: &str) -> bool {
        self.accepted_sources.is_empty() || self.accepted_sources.iter().any(|s| s == provenance)
    }

    fn within_bounds(&self, size: f64) -> bool {
        self.min_size.is_none_or(|min| size >= min) && self.max_size.is_none_or(|max| size <= max)
    }
}

/// Drop counters collected while building a pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub total_rows: usize,
    pub eligible: usize,
    pub invalid_size: usize,
    pub unrecognized_type: usize,
    pub unsearchable_type: usize,
    pub rejected_source: usize,
    pub out_of_bounds: usize,
    pub over_target: usize,
}

impl PoolStats {
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.total_rows - self.eligible
    }
}

/// Three size-ascending groups, one per searchable type.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool<'a> {
    groups: [Vec<PoolItem<'a>>; 3],
    stats: PoolStats,
}

impl<'a> CandidatePool<'a> {
    /// Build a pool from `items`. Never fails; unusable rows are counted.
    #[must_use]
    pub fn build(items: &'a [RawItem], filter: &PoolFilter<'_>) -> Self {
        let mut groups: [Vec<PoolItem<'a>>; 3] = Default::default();
        let mut stats = PoolStats {
            total_rows: items.len(),
            ..PoolStats::default()
        };

        for (source_index, raw) in items.iter().enumerate() {
            let size = raw.size;
            if !size.is_finite() || size <= 0.0 {
                stats.invalid_size += 1;
                continue;
            }
            let Some(unit_type) = normalize_type(&raw.category_label) else {
                stats.unrecognized_type += 1;
                continue;
            };
            let Some(group) = unit_type.group_index() else {
                stats.unsearchable_type += 1;
                continue;
            };
            if !filter.source_accepted(&raw.provenance) {
                stats.rejected_source += 1;
                continue;
            }
            if !filter.within_bounds(size) {
                stats.out_of_bounds += 1;
                continue;
            }
            if !fits(size, filter.target) {
                stats.over_target += 1;
                continue;
            }

            groups[group].push(PoolItem {
                size,
                unit_type,
                source_index,
                raw,
            });
            stats.eligible += 1;
        }

        // Stable: equal sizes keep source order.
        for group in &mut groups {
            group.sort_by(|a, b| a.size.total_cmp(&b.size));
        }

        debug!(
            total = stats.total_rows,
            eligible = stats.eligible,
            a = groups[0].len(),
            b = groups[1].len(),
            c = groups[2].len(),
            invalid_size = stats.invalid_size,
            unrecognized_type = stats.unrecognized_type,
            unsearchable_type = stats.unsearchable_type,
            rejected_source = stats.rejected_source,
            out_of_bounds = stats.out_of_bounds,
            over_target = stats.over_target,
            "built candidate pool"
        );

        Self { groups, stats }
    }

    #[must_use]
    pub fn group(&self, unit_type: UnitType) -> &[PoolItem<'a>] {
        unit_type
            .group_index()
            .map_or(&[], |idx| self.groups[idx].as_slice())
    }

    /// True when every searchable type has at least one item.
    #[must_use]
    pub fn has_coverage(&self) -> bool {
        self.groups.iter().all(|g| !g.is_empty())
    }

    #[must_use]
    pub const fn stats(&self) -> &PoolStats {
        &self.stats
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
