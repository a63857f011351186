//! Seeded synthetic pools for benchmarks and large-pool tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::RawItem;

/// Shape of a synthetic data set.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticPool {
    /// Rows per searchable type.
    pub per_type: usize,
    pub min_size: f64,
    pub max_size: f64,
    /// Share of rows tagged `secondary`; the rest are `primary`.
    pub secondary_ratio: f64,
    pub seed: u64,
}

impl Default for SyntheticPool {
    fn default() -> Self {
        Self {
            per_type: 100,
            min_size: 40.0,
            max_size: 140.0,
            secondary_ratio: 0.3,
            seed: 7,
        }
    }
}

impl SyntheticPool {
    /// Generate rows, sizes rounded to two decimals.
    #[must_use]
    pub fn items(&self) -> Vec<RawItem> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut items = Vec::with_capacity(self.per_type * 3);
        for _ in 0..self.per_type {
            for label in ["A", "B", "C"] {
                let size = rng.random_range(self.min_size..=self.max_size);
                let size = (size * 100.0).round() / 100.0;
                let source = if rng.random_bool(self.secondary_ratio.clamp(0.0, 1.0)) {
                    "secondary"
                } else {
                    "primary"
                };
                items.push(RawItem::new(size, label, source));
            }
        }
        items
    }
}

/// `per_type` rows of each type with default sizing.
#[must_use]
pub fn synthetic_items(per_type: usize, seed: u64) -> Vec<RawItem> {
    SyntheticPool {
        per_type,
        seed,
        ..SyntheticPool::default()
    }
    .items()
}
