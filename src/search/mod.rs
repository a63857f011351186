//! Constrained top-K combination search
//!
//! Finds the K best 3- and 4-unit combinations whose total size stays within
//! a target, covering every searchable type and at least one unit from the
//! must-include source.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                  RawItem snapshot + SearchRequest              │
//! └────────────────────────────────────────────────────────────────┘
//!                                │
//!                                ▼
//!                ┌───────────────────────────────┐
//!                │  CandidatePool (core/pool.rs) │
//!                └───────────────────────────────┘
//!                                │
//!                                ▼
//! ┌──────────────────────────────┐  ┌──────────────────────────────┐
//! │  Enumerator (enumerate.rs)   │──│  best_fit (core/bisect.rs)   │
//! └──────────────────────────────┘  └──────────────────────────────┘
//!                                │
//!                                ▼
//! ┌──────────────────────────────┐  ┌──────────────────────────────┐
//! │  RuleSet (filters.rs)        │─▶│  TopK (topk.rs)              │
//! └──────────────────────────────┘  └──────────────────────────────┘
//!                                │
//!                                ▼
//!                 format_results (result.rs) → caller
//! ```

pub mod engine;
pub mod enumerate;
pub mod filters;
pub mod result;
pub mod topk;

// Re-export main types
pub use engine::{DEFAULT_K, SearchOptions, SearchOutcome, SearchRequest, search, search_with_stats};
pub use enumerate::{Enumerator, SearchStats};
pub use filters::{
    AntiDominance, AntiDominanceRule, ComboRule, ProvenanceCoverage, RuleSet, SourceOversizeCap,
};
pub use result::{Pick, SUM_PRECISION, SearchResult, format_results, round_to};
pub use topk::{Candidate, ComboKey, Offer, TopK};
