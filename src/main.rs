//! Pet-store harness - scenario runner for the pet-store backend
//!
//! Exercises the backend's REST and GraphQL endpoints (authentication,
//! promotions, categories, products) and reports pass/fail per scenario.

use std::path::PathBuf;

use clap::Parser;
use petstore_harness::common::{logging, Config};
use petstore_harness::{cli, commands::Commands, report, Result};

#[derive(Parser)]
#[command(
    name = "petstore-harness",
    about = "Scenario harness for the pet-store backend"
)]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file (default: platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the configuration file
    #[arg(long, global = true, env = "PETSTORE_BASE_URL")]
    base_url: Option<String>,

    /// Debug-level logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_cli(cli.verbose);

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(report::EXIT_ERROR);
        }
    }
}

async fn run(args: Cli) -> Result<i32> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        config.backend.base_url = base_url;
    }
    cli::dispatch(args.command, config).await
}
