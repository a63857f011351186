//! Bounded, deduplicated top-K collector.
//!
//! Keeps at most `k` distinct combinations ordered by `sum` descending. A new
//! combination lands after every kept entry with an equal or larger sum, so
//! among ties the earliest offer wins.

use std::collections::HashSet;

use crate::core::{PoolItem, UnitType};

/// Order-independent identity of a combination.
///
/// Built from the sorted `(size, type, provenance)` triples of the picks, so
/// two picks of interchangeable rows compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComboKey<'a>(Vec<(u64, UnitType, &'a str)>);

impl<'a> ComboKey<'a> {
    #[must_use]
    pub fn of(picks: &[PoolItem<'a>]) -> Self {
        // Sizes are finite and positive, so bit order matches numeric order.
        let mut parts: Vec<(u64, UnitType, &'a str)> = picks
            .iter()
            .map(|p| (p.size.to_bits(), p.unit_type, p.provenance()))
            .collect();
        parts.sort_unstable();
        Self(parts)
    }
}

/// A combination that made it into the collector.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub sum: f64,
    pub picks: Vec<PoolItem<'a>>,
    key: ComboKey<'a>,
}

impl<'a> Candidate<'a> {
    #[must_use]
    pub const fn key(&self) -> &ComboKey<'a> {
        &self.key
    }
}

/// What happened to an offered combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// Entered the collector (possibly evicting the previous worst entry).
    Kept,
    /// An identical combination is already held.
    Duplicate,
    /// The collector is full and the sum does not beat the worst entry.
    Dropped,
}

#[derive(Debug, Clone)]
pub struct TopK<'a> {
    k: usize,
    entries: Vec<Candidate<'a>>,
    present: HashSet<ComboKey<'a>>,
}

impl<'a> TopK<'a> {
    /// A collector holding at most `k` entries. `k` is clamped to at least 1.
    #[must_use]
    pub fn new(k: usize) -> Self {
        let k = k.max(1);
        Self {
            k,
            entries: Vec::with_capacity(k.min(1024) + 1),
            present: HashSet::new(),
        }
    }

    pub fn offer(&mut self, sum: f64, picks: Vec<PoolItem<'a>>) -> Offer {
        let key = ComboKey::of(&picks);
        if self.present.contains(&key) {
            return Offer::Duplicate;
        }

        let pos = self.entries.partition_point(|e| e.sum >= sum);
        if pos >= self.k {
            return Offer::Dropped;
        }

        self.present.insert(key.clone());
        self.entries.insert(pos, Candidate { sum, picks, key });

        if self.entries.len() > self.k {
            if let Some(evicted) = self.entries.pop() {
                self.present.remove(&evicted.key);
            }
        }
        Offer::Kept
    }

    /// Sum of the worst kept entry once the collector is full.
    #[must_use]
    pub fn min_keep(&self) -> Option<f64> {
        if self.is_full() {
            self.entries.last().map(|e| e.sum)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.k
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.k
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[Candidate<'a>] {
        &self.entries
    }

    #[must_use]
    pub fn into_sorted_vec(self) -> Vec<Candidate<'a>> {
        self.entries
    }
}
