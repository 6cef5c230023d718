//! CLI command definitions
//!
//! Defines the clap commands for the harness CLI.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::scenarios::Suite;

#[derive(Subcommand)]
pub enum Commands {
    /// Run a built-in scenario suite against the backend
    Run {
        /// Suite to run
        #[arg(long, value_enum, default_value_t = Suite::Full)]
        suite: Suite,

        /// Shorthand for --suite login-only
        #[arg(long, conflicts_with_all = ["suite", "promotions_only"])]
        login_only: bool,

        /// Shorthand for --suite promotions-only
        #[arg(long, conflicts_with = "suite")]
        promotions_only: bool,

        /// Only run the named scenario(s) from the suite
        /// Can be specified multiple times: --only rest-login --only verify-token
        #[arg(long = "only", value_name = "NAME")]
        only: Vec<String>,

        #[command(flatten)]
        credentials: CredentialArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Run scenarios defined in YAML files
    Scenario {
        /// Paths to YAML scenario files, run in the given order
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        credentials: CredentialArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List built-in scenarios
    List {
        /// Only list scenarios of this suite
        #[arg(long, value_enum)]
        suite: Option<Suite>,
    },
}

/// Login credentials overriding the configuration file
#[derive(Args, Debug, Default)]
pub struct CredentialArgs {
    /// Login email
    #[arg(long, env = "PETSTORE_EMAIL")]
    pub email: Option<String>,

    /// Login password
    #[arg(long, env = "PETSTORE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// How results are presented
#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Print the run report as JSON instead of console lines
    #[arg(long)]
    pub json: bool,

    /// Also write the JSON report to this file
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Hide per-scenario response details
    #[arg(long)]
    pub quiet: bool,
}

impl Commands {
    /// Suite selected by `run`, honoring the shorthand flags
    pub fn resolve_suite(suite: Suite, login_only: bool, promotions_only: bool) -> Suite {
        if login_only {
            Suite::LoginOnly
        } else if promotions_only {
            Suite::PromotionsOnly
        } else {
            suite
        }
    }
}
