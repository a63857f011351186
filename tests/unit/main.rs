//! Unit test suite entry point.

mod pipeline_tests;
mod scenario_tests;
