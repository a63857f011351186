//! fitpick: constrained top-K search for 3- and 4-unit combinations.
//!
//! Given rows from one or more source collections, find the combinations
//! (one unit per type A, B and C, optionally one type doubled) whose total
//! size gets closest to a target without exceeding it.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod export;
pub mod import;
pub mod search;
pub mod test_utils;

pub use error::{FitError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
