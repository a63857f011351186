//! Branch-and-bound enumeration of 3- and 4-unit combinations.
//!
//! ## Shapes
//!
//! ```text
//! 3 units:  A + B + C            (C closes the sum via best-fit)
//! 4 units:  X + X + Y + Z        (X ∈ {A, B, C}; Z closes the sum)
//! ```
//!
//! Outer loops walk each size-ascending group from the largest item down.
//! Once the collector is full, any branch whose optimistic sum cannot beat
//! the current worst kept sum is cut, together with every smaller sibling.
//! Cut branches can only produce offers the collector would drop, so pruned
//! and exhaustive runs return the same entries in the same order.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::filters::RuleSet;
use super::topk::{Offer, TopK};
use crate::core::{CandidatePool, PoolItem, UnitType, best_fit, fits, upper_bound};

/// Duplicated-type layouts for the 4-unit search: (X, Y, Z).
const FOUR_UNIT_LAYOUTS: [(UnitType, UnitType, UnitType); 3] = [
    (UnitType::A, UnitType::B, UnitType::C),
    (UnitType::B, UnitType::A, UnitType::C),
    (UnitType::C, UnitType::A, UnitType::B),
];

/// Counters describing one enumeration run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Complete combinations formed (before rules).
    pub generated: usize,
    /// Rejections keyed by rule name.
    pub rejected: BTreeMap<&'static str, usize>,
    /// Offers that entered the collector.
    pub kept: usize,
    /// Offers identical to a held combination.
    pub duplicates: usize,
    /// Offers that could not beat a full collector.
    pub dropped: usize,
    /// Branches cut by the bound.
    pub pruned: usize,
}

impl SearchStats {
    #[must_use]
    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }
}

/// Enumerates combinations from one pool into a top-K collector.
#[derive(Debug)]
pub struct Enumerator<'p, 'a> {
    pool: &'p CandidatePool<'a>,
    rules: &'p RuleSet,
    target: f64,
    prune: bool,
}

struct Run<'r, 'a> {
    rules: &'r RuleSet,
    names: Vec<&'static str>,
    target: f64,
    prune: bool,
    topk: TopK<'a>,
    stats: SearchStats,
}

impl<'a> Run<'_, 'a> {
    /// True when nothing with sum at most `bound` can enter the collector.
    fn cannot_improve(&mut self, bound: f64) -> bool {
        let cut = self.prune && self.topk.min_keep().is_some_and(|worst| bound <= worst);
        if cut {
            self.stats.pruned += 1;
        }
        cut
    }

    fn consider(&mut self, sum: f64, picks: Vec<PoolItem<'a>>) {
        if !fits(sum, self.target) {
            return;
        }
        self.stats.generated += 1;
        if let Some(idx) = self.rules.first_rejection(&picks) {
            *self.stats.rejected.entry(self.names[idx]).or_insert(0) += 1;
            return;
        }
        match self.topk.offer(sum, picks) {
            Offer::Kept => self.stats.kept += 1,
            Offer::Duplicate => self.stats.duplicates += 1,
            Offer::Dropped => self.stats.dropped += 1,
        }
    }
}

impl<'p, 'a> Enumerator<'p, 'a> {
    #[must_use]
    pub const fn new(pool: &'p CandidatePool<'a>, rules: &'p RuleSet, target: f64) -> Self {
        Self {
            pool,
            rules,
            target,
            prune: true,
        }
    }

    /// Disable bound pruning. Results are unchanged; only work differs.
    #[must_use]
    pub const fn exhaustive(mut self) -> Self {
        self.prune = false;
        self
    }

    /// Enumerate every reachable combination and keep the best `k`.
    #[must_use]
    pub fn run(&self, k: usize) -> (TopK<'a>, SearchStats) {
        let mut run = Run {
            rules: self.rules,
            names: self.rules.names(),
            target: self.target,
            prune: self.prune,
            topk: TopK::new(k),
            stats: SearchStats::default(),
        };

        if !self.pool.has_coverage() {
            debug!("pool lacks type coverage; nothing to enumerate");
            return (run.topk, run.stats);
        }

        self.three_units(&mut run);
        for (x, y, z) in FOUR_UNIT_LAYOUTS {
            self.four_units(&mut run, x, y, z);
        }

        debug!(
            size_target = self.target,
            k,
            prune = self.prune,
            generated = run.stats.generated,
            rejected = run.stats.rejected_total(),
            kept = run.stats.kept,
            duplicates = run.stats.duplicates,
            dropped = run.stats.dropped,
            pruned = run.stats.pruned,
            results = run.topk.len(),
            "enumeration finished"
        );
        (run.topk, run.stats)
    }

    fn three_units(&self, run: &mut Run<'_, 'a>) {
        let target = self.target;
        let ga = self.pool.group(UnitType::A);
        let gb = self.pool.group(UnitType::B);
        let gc = self.pool.group(UnitType::C);
        let (Some(max_b), Some(max_c)) = (last_size(gb), last_size(gc)) else {
            return;
        };

        for a in ga.iter().rev() {
            if run.cannot_improve(a.size + max_b + max_c) {
                break;
            }
            let b_end = upper_bound(gb, target - a.size);
            for b in gb[..b_end].iter().rev() {
                let partial = a.size + b.size;
                if !fits(partial, target) {
                    continue;
                }
                if run.cannot_improve(partial + max_c) {
                    break;
                }
                // Only the best-fit closer is offered; a rejected one is not retried smaller.
                if let Some(c) = best_fit(gc, target - partial) {
                    run.consider(partial + c.size, vec![*a, *b, *c]);
                }
            }
        }
    }

    fn four_units(&self, run: &mut Run<'_, 'a>, x: UnitType, y: UnitType, z: UnitType) {
        let target = self.target;
        let gx = self.pool.group(x);
        let gy = self.pool.group(y);
        let gz = self.pool.group(z);
        if gx.len() < 2 {
            return;
        }
        let (Some(max_y), Some(max_z)) = (last_size(gy), last_size(gz)) else {
            return;
        };

        for j in (1..gx.len()).rev() {
            let xj = gx[j];
            if run.cannot_improve(gx[j - 1].size + xj.size + max_y + max_z) {
                break;
            }
            let i_end = upper_bound(&gx[..j], target - xj.size);
            for i in (0..i_end).rev() {
                let xi = gx[i];
                let sum_xx = xi.size + xj.size;
                if !fits(sum_xx, target) {
                    continue;
                }
                if run.cannot_improve(sum_xx + max_y + max_z) {
                    break;
                }
                let y_end = upper_bound(gy, target - sum_xx);
                for yk in gy[..y_end].iter().rev() {
                    let partial = sum_xx + yk.size;
                    if !fits(partial, target) {
                        continue;
                    }
                    if run.cannot_improve(partial + max_z) {
                        break;
                    }
                    // No retry with a smaller closer when a rule rejects this one.
                    if let Some(zk) = best_fit(gz, target - partial) {
                        run.consider(partial + zk.size, vec![xi, xj, *yk, *zk]);
                    }
                }
            }
        }
    }
}

fn last_size(group: &[PoolItem<'_>]) -> Option<f64> {
    group.last().map(|item| item.size)
}
