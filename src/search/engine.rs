//! Search entry point.
//!
//! One call = one self-contained run over an immutable item snapshot:
//! validate → build pool → enumerate → format. Nothing is shared between
//! calls, so any number of searches may run concurrently over the same slice.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::enumerate::{Enumerator, SearchStats};
use super::filters::{AntiDominance, ProvenanceCoverage, RuleSet, SourceOversizeCap};
use super::result::{SearchResult, format_results};
use crate::core::{CandidatePool, PoolFilter, PoolStats, RawItem};
use crate::error::{FitError, Result};

/// Default number of results when a request does not say.
pub const DEFAULT_K: usize = 10;

const fn default_k() -> usize {
    DEFAULT_K
}

/// Optional knobs of a search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Inclusive lower bound on unit size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<f64>,
    /// Inclusive upper bound on unit size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<f64>,
    /// Provenance tags admitted to the pool. Empty admits all.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepted_sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anti_dominance: Option<AntiDominance>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub oversize_caps: Vec<SourceOversizeCap>,
}

/// Parameters of one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Size budget; every result sums to at most this.
    pub target: f64,
    /// Source that must contribute at least one unit to every result.
    pub must_include: String,
    /// Maximum number of results.
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default)]
    pub options: SearchOptions,
}

impl SearchRequest {
    pub fn new(target: f64, must_include: impl Into<String>, k: usize) -> Self {
        Self {
            target,
            must_include: must_include.into(),
            k,
            options: SearchOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Reject out-of-range or inconsistent parameters.
    pub fn validate(&self) -> Result<()> {
        if !self.target.is_finite() || self.target <= 0.0 {
            return Err(invalid(format!(
                "target must be a finite positive number (got {})",
                self.target
            )));
        }
        if self.k < 1 {
            return Err(invalid("k must be at least 1".to_string()));
        }
        if self.must_include.trim().is_empty() {
            return Err(invalid("must-include source must not be empty".to_string()));
        }

        let opts = &self.options;
        for (name, bound) in [("min_size", opts.min_size), ("max_size", opts.max_size)] {
            if let Some(value) = bound {
                if !value.is_finite() || value <= 0.0 {
                    return Err(invalid(format!(
                        "{name} must be a finite positive size (got {value})"
                    )));
                }
            }
        }
        if let (Some(min), Some(max)) = (opts.min_size, opts.max_size) {
            if min > max {
                return Err(invalid(format!(
                    "min_size ({min}) exceeds max_size ({max})"
                )));
            }
        }

        if let Some(anti) = &opts.anti_dominance {
            let thresholds = [anti.dominant_threshold, anti.others_threshold];
            if thresholds.iter().flatten().any(|t| !t.is_finite()) {
                return Err(invalid(
                    "anti_dominance thresholds must be finite".to_string(),
                ));
            }
        }
        for cap in &opts.oversize_caps {
            if !cap.size_threshold.is_finite() {
                return Err(invalid(format!(
                    "oversize cap threshold for '{}' must be finite",
                    cap.source
                )));
            }
        }
        Ok(())
    }

    /// Business rules implied by this request, in evaluation order.
    #[must_use]
    pub fn rules(&self) -> RuleSet {
        let mut rules = RuleSet::new().with_rule(ProvenanceCoverage::new(self.must_include.clone()));
        if let Some(rule) = self.options.anti_dominance.as_ref().and_then(AntiDominance::rule) {
            rules = rules.with_rule(rule);
        }
        for cap in &self.options.oversize_caps {
            rules = rules.with_rule(cap.clone());
        }
        rules
    }

    #[must_use]
    pub fn pool_filter(&self) -> PoolFilter<'_> {
        PoolFilter {
            target: self.target,
            accepted_sources: &self.options.accepted_sources,
            min_size: self.options.min_size,
            max_size: self.options.max_size,
        }
    }
}

fn invalid(reason: String) -> FitError {
    FitError::InvalidInput(reason)
}

/// Results together with pool and enumeration counters.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub pool: PoolStats,
    pub stats: SearchStats,
}

/// Run one search and return the ranked results (possibly empty).
pub fn search(items: &[RawItem], request: &SearchRequest) -> Result<Vec<SearchResult>> {
    search_with_stats(items, request).map(|outcome| outcome.results)
}

/// Like [`search`], also reporting what was dropped and how much was pruned.
pub fn search_with_stats(items: &[RawItem], request: &SearchRequest) -> Result<SearchOutcome> {
    request.validate()?;

    let pool = CandidatePool::build(items, &request.pool_filter());
    let pool_stats = *pool.stats();
    if pool_stats.dropped() > 0 {
        debug!(dropped = pool_stats.dropped(), "dropped unusable rows");
    }

    let rules = request.rules();
    let (topk, stats) = Enumerator::new(&pool, &rules, request.target).run(request.k);
    let results = format_results(topk.into_sorted_vec(), request.target);

    info!(
        size_target = request.target,
        k = request.k,
        must_include = %request.must_include,
        results = results.len(),
        "search complete"
    );

    Ok(SearchOutcome {
        results,
        pool: pool_stats,
        stats,
    })
}
