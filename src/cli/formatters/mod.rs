//! Output formatters for CLI commands
//!
//! Provides structured formatters for common output types that can render
//! to multiple formats (Human, JSON, JSONL, Plain, TSV).

mod results;

pub use results::ResultsView;
