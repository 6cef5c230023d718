//! Pet-store harness - scenario runner for the pet-store backend
//!
//! This library provides the request helpers, session handling, scenario
//! runner and built-in scenarios used by the `petstore-harness` CLI.

pub mod cli;
pub mod commands;
pub mod common;
pub mod http;
pub mod report;
pub mod runner;
pub mod scenarios;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Credentials, Error, RequestError, Result};
pub use http::{ApiClient, RequestOptions, RequestResult, Session};
pub use runner::{OutcomeStatus, RunReport, Runner, Scenario, ScenarioOutcome, Verdict};
pub use scenarios::Suite;
