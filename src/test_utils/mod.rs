//! Shared test utilities for fitpick.
//!
//! Used by unit tests, the integration suites under `tests/` and the
//! benchmarks, so it is compiled into the library.

pub mod fixtures;
pub mod generate;

pub use fixtures::{SourceFixture, scenario_items};
pub use generate::{SyntheticPool, synthetic_items};
