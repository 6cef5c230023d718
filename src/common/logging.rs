//! Logging and tracing configuration
//!
//! Logs go to stderr so that stdout carries only scenario results and
//! JSON reports.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing for the CLI
///
/// Logs are controlled by the `RUST_LOG` environment variable.
/// Default level is INFO for this crate (DEBUG with `verbose`), WARN for
/// dependencies.
pub fn init_cli(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "petstore_harness=debug,warn"
    } else {
        "petstore_harness=info,warn"
    }
}
