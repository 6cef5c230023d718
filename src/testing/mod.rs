//! Scenario files
//!
//! Reads user-authored YAML scenarios and runs them through the same
//! runner, client and session as the built-in suites, so assertions are
//! made against structured request results rather than console output.

mod config;
mod runner;

pub use config::*;
pub use runner::{load_scenario, parse_scenario, FileScenario};
