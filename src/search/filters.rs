//! Business rules applied to every fully formed combination
//!
//! Structural constraints (type coverage, sum within target) hold by
//! construction. Rules here express deployment policy:
//! - Provenance coverage (at least one pick from the must-include source)
//! - Anti-dominance (one oversized unit padded with small ones)
//! - Per-source oversize caps
//!
//! Rules are pure predicates over the picked multiset and compose with AND.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::PoolItem;

/// A pure acceptance predicate over a complete combination.
pub trait ComboRule: Send + Sync {
    /// Short stable name, used in statistics and logs.
    fn name(&self) -> &'static str;

    fn accepts(&self, picks: &[PoolItem<'_>]) -> bool;
}

/// Require at least one pick from the must-include source.
#[derive(Debug, Clone)]
pub struct ProvenanceCoverage {
    pub must_include: String,
}

impl ProvenanceCoverage {
    pub fn new(must_include: impl Into<String>) -> Self {
        Self {
            must_include: must_include.into(),
        }
    }
}

impl ComboRule for ProvenanceCoverage {
    fn name(&self) -> &'static str {
        "provenance_coverage"
    }

    fn accepts(&self, picks: &[PoolItem<'_>]) -> bool {
        picks.iter().any(|p| p.provenance() == self.must_include)
    }
}

/// Anti-dominance settings as they appear in config and requests.
///
/// The rule is only active when `enabled` is set and both thresholds exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AntiDominance {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub dominant_threshold: Option<f64>,
    #[serde(default)]
    pub others_threshold: Option<f64>,
}

impl AntiDominance {
    #[must_use]
    pub const fn new(dominant_threshold: f64, others_threshold: f64) -> Self {
        Self {
            enabled: true,
            dominant_threshold: Some(dominant_threshold),
            others_threshold: Some(others_threshold),
        }
    }

    /// The concrete rule, if this configuration activates one.
    #[must_use]
    pub fn rule(&self) -> Option<AntiDominanceRule> {
        if !self.enabled {
            return None;
        }
        Some(AntiDominanceRule {
            dominant_threshold: self.dominant_threshold?,
            others_threshold: self.others_threshold?,
        })
    }
}

/// Reject combinations where exactly one unit is above `dominant_threshold`
/// while every other unit is below `others_threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AntiDominanceRule {
    pub dominant_threshold: f64,
    pub others_threshold: f64,
}

impl ComboRule for AntiDominanceRule {
    fn name(&self) -> &'static str {
        "anti_dominance"
    }

    fn accepts(&self, picks: &[PoolItem<'_>]) -> bool {
        let dominant = picks
            .iter()
            .filter(|p| p.size > self.dominant_threshold)
            .count();
        if dominant != 1 {
            return true;
        }
        let others_small = picks
            .iter()
            .filter(|p| p.size <= self.dominant_threshold)
            .all(|p| p.size < self.others_threshold);
        !others_small
    }
}

/// Cap how many oversized units a single source may contribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceOversizeCap {
    /// Provenance tag the cap applies to.
    pub source: String,
    /// Units strictly larger than this count as oversized.
    pub size_threshold: f64,
    /// Maximum oversized units from `source` in one combination.
    pub max_count: usize,
}

impl ComboRule for SourceOversizeCap {
    fn name(&self) -> &'static str {
        "source_oversize_cap"
    }

    fn accepts(&self, picks: &[PoolItem<'_>]) -> bool {
        picks
            .iter()
            .filter(|p| p.provenance() == self.source && p.size > self.size_threshold)
            .count()
            <= self.max_count
    }
}

/// Ordered set of rules evaluated with short-circuit AND.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn ComboRule>>,
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.name()))
            .finish()
    }
}

impl RuleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rule(mut self, rule: impl ComboRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn push(&mut self, rule: Box<dyn ComboRule>) {
        self.rules.push(rule);
    }

    /// Index of the first rule rejecting `picks`, or `None` when all accept.
    #[must_use]
    pub fn first_rejection(&self, picks: &[PoolItem<'_>]) -> Option<usize> {
        self.rules.iter().position(|rule| !rule.accepts(picks))
    }

    #[must_use]
    pub fn accepts(&self, picks: &[PoolItem<'_>]) -> bool {
        self.first_rejection(picks).is_none()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RawItem, normalize_type};

    fn picks(raws: &[RawItem]) -> Vec<PoolItem<'_>> {
        raws.iter()
            .enumerate()
            .map(|(source_index, raw)| PoolItem {
                size: raw.size,
                unit_type: normalize_type(&raw.category_label).unwrap(),
                source_index,
                raw,
            })
            .collect()
    }

    #[test]
    fn test_provenance_coverage() {
        let rule = ProvenanceCoverage::new("secondary");
        let with = vec![
            RawItem::new(20.0, "A", "primary"),
            RawItem::new(5.0, "B", "secondary"),
            RawItem::new(8.0, "C", "primary"),
        ];
        let without = vec![
            RawItem::new(20.0, "A", "primary"),
            RawItem::new(5.0, "B", "primary"),
            RawItem::new(8.0, "C", "primary"),
        ];
        assert!(rule.accepts(&picks(&with)));
        assert!(!rule.accepts(&picks(&without)));
    }

    #[test]
    fn test_anti_dominance_rejects_lone_giant() {
        let rule = AntiDominance::new(100.0, 70.0).rule().unwrap();
        let lone = vec![
            RawItem::new(120.0, "A", "p"),
            RawItem::new(30.0, "B", "p"),
            RawItem::new(20.0, "C", "p"),
        ];
        assert!(!rule.accepts(&picks(&lone)));
    }

    #[test]
    fn test_anti_dominance_allows_balanced_or_two_giants() {
        let rule = AntiDominance::new(100.0, 70.0).rule().unwrap();
        let medium_partner = vec![
            RawItem::new(120.0, "A", "p"),
            RawItem::new(70.0, "B", "p"),
            RawItem::new(20.0, "C", "p"),
        ];
        let two_giants = vec![
            RawItem::new(120.0, "A", "p"),
            RawItem::new(110.0, "B", "p"),
            RawItem::new(20.0, "C", "p"),
        ];
        let at_threshold = vec![
            RawItem::new(100.0, "A", "p"),
            RawItem::new(30.0, "B", "p"),
            RawItem::new(20.0, "C", "p"),
        ];
        assert!(rule.accepts(&picks(&medium_partner)));
        assert!(rule.accepts(&picks(&two_giants)));
        assert!(rule.accepts(&picks(&at_threshold)));
    }

    #[test]
    fn test_anti_dominance_requires_both_thresholds() {
        assert!(AntiDominance::default().rule().is_none());
        let missing = AntiDominance {
            enabled: true,
            dominant_threshold: Some(100.0),
            others_threshold: None,
        };
        assert!(missing.rule().is_none());
        let disabled = AntiDominance {
            enabled: false,
            ..AntiDominance::new(100.0, 70.0)
        };
        assert!(disabled.rule().is_none());
    }

    #[test]
    fn test_source_oversize_cap() {
        let cap = SourceOversizeCap {
            source: "secondary".to_string(),
            size_threshold: 90.0,
            max_count: 1,
        };
        let one = vec![
            RawItem::new(95.0, "A", "secondary"),
            RawItem::new(50.0, "B", "secondary"),
            RawItem::new(99.0, "C", "primary"),
        ];
        let two = vec![
            RawItem::new(95.0, "A", "secondary"),
            RawItem::new(91.0, "B", "secondary"),
            RawItem::new(20.0, "C", "primary"),
        ];
        assert!(cap.accepts(&picks(&one)));
        assert!(!cap.accepts(&picks(&two)));
    }

    #[test]
    fn test_rule_set_reports_first_rejection() {
        let rules = RuleSet::new()
            .with_rule(ProvenanceCoverage::new("primary"))
            .with_rule(AntiDominance::new(100.0, 70.0).rule().unwrap());
        assert_eq!(rules.names(), vec!["provenance_coverage", "anti_dominance"]);

        let giant = vec![
            RawItem::new(120.0, "A", "primary"),
            RawItem::new(30.0, "B", "p"),
            RawItem::new(20.0, "C", "p"),
        ];
        assert_eq!(rules.first_rejection(&picks(&giant)), Some(1));

        let foreign = vec![
            RawItem::new(60.0, "A", "x"),
            RawItem::new(30.0, "B", "x"),
            RawItem::new(20.0, "C", "x"),
        ];
        assert_eq!(rules.first_rejection(&picks(&foreign)), Some(0));
        assert!(RuleSet::new().accepts(&picks(&foreign)));
    }
}
