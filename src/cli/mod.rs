//! CLI command handling
//!
//! Turns parsed commands into scenario lists, runs them and presents the
//! report. Returns the process exit code.

use colored::Colorize;

use crate::commands::{Commands, CredentialArgs, OutputArgs};
use crate::common::{Config, Result};
use crate::http::ApiClient;
use crate::report;
use crate::runner::{Runner, Scenario};
use crate::scenarios::Suite;
use crate::testing::load_scenario;

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, mut config: Config) -> Result<i32> {
    match command {
        Commands::Run {
            suite,
            login_only,
            promotions_only,
            only,
            credentials,
            output,
        } => {
            let suite = Commands::resolve_suite(suite, login_only, promotions_only);
            let scenarios = suite.select(&only)?;
            apply_credentials(&mut config, credentials);
            execute(config, suite.name(), scenarios, &output).await
        }

        Commands::Scenario {
            paths,
            credentials,
            output,
        } => {
            // Load every file first so a typo fails before any request is made
            let scenarios = paths
                .iter()
                .map(|path| load_scenario(path).map(|s| Box::new(s) as Box<dyn Scenario>))
                .collect::<Result<Vec<_>>>()?;
            apply_credentials(&mut config, credentials);
            execute(config, "scenario-files", scenarios, &output).await
        }

        Commands::List { suite } => {
            let suites = match suite {
                Some(suite) => vec![suite],
                None => vec![
                    Suite::Full,
                    Suite::Auth,
                    Suite::LoginOnly,
                    Suite::PromotionsOnly,
                    Suite::Products,
                ],
            };
            for suite in suites {
                print_suite(suite);
            }
            Ok(report::EXIT_OK)
        }
    }
}

fn apply_credentials(config: &mut Config, args: CredentialArgs) {
    if let Some(email) = args.email {
        config.credentials.email = email;
    }
    if let Some(password) = args.password {
        config.credentials.password = password;
    }
}

async fn execute(
    config: Config,
    label: &str,
    scenarios: Vec<Box<dyn Scenario>>,
    output: &OutputArgs,
) -> Result<i32> {
    let client = ApiClient::from_config(&config)?;
    let base_url = client.base_url().to_string();
    let mut runner = Runner::new(client, config.credentials);

    let live = !output.json;
    let show_detail = !output.quiet;

    if live {
        report::print_header(label, &base_url);
    }

    let run = runner
        .run(label, &scenarios, |outcome| {
            if live {
                report::print_outcome(outcome, show_detail);
            }
        })
        .await;

    if output.json {
        println!("{}", report::to_json(&run)?);
    } else {
        report::print_summary(&run);
    }

    if let Some(path) = &output.report {
        report::write_json(&run, path)?;
    }

    Ok(report::exit_code(&run))
}

fn print_suite(suite: Suite) {
    println!("{}", suite.name().cyan().bold());
    for scenario in suite.scenarios() {
        let marker = if scenario.requires_session() {
            "[session]".yellow()
        } else {
            "[public] ".dimmed()
        };
        println!(
            "  {:<28} {} {}",
            scenario.name(),
            marker,
            scenario.description().dimmed()
        );
    }
    println!();
}
