//! Presentation of run results: console lines, JSON report, exit code

use std::path::Path;

use colored::Colorize;

use crate::common::{Error, Result};
use crate::runner::{OutcomeStatus, RunReport, ScenarioOutcome};

/// Exit code when every scenario passed or was skipped
pub const EXIT_OK: i32 = 0;
/// Exit code when at least one scenario failed
pub const EXIT_FAILED: i32 = 1;
/// Exit code for harness errors (config, scenario files, report output)
pub const EXIT_ERROR: i32 = 2;

pub fn exit_code(report: &RunReport) -> i32 {
    if report.has_failures() {
        EXIT_FAILED
    } else {
        EXIT_OK
    }
}

/// Banner printed before the first scenario
pub fn print_header(suite: &str, base_url: &str) {
    println!(
        "\n{} {}",
        "Running Suite:".blue().bold(),
        suite.white().bold()
    );
    println!("  {}", format!("Backend: {}", base_url).dimmed());
    println!();
}

/// One line per scenario, followed by its detail when present
pub fn print_outcome(outcome: &ScenarioOutcome, show_detail: bool) {
    let marker = match outcome.status {
        OutcomeStatus::Passed => "✓".green(),
        OutcomeStatus::Failed => "✗".red(),
        OutcomeStatus::Skipped => "-".yellow(),
    };

    println!("  {} {}: {}", marker, outcome.name.bold(), outcome.message);

    if show_detail {
        if let Some(detail) = &outcome.detail {
            let rendered =
                serde_json::to_string_pretty(detail).unwrap_or_else(|_| detail.to_string());
            for line in rendered.lines() {
                println!("      {}", line.dimmed());
            }
        }
    }
}

pub fn print_summary(report: &RunReport) {
    let summary = &report.summary;
    let counts = format!(
        "{} passed, {} failed, {} skipped ({} total)",
        summary.passed, summary.failed, summary.skipped, summary.total
    );

    if report.has_failures() {
        println!("\n{} {}\n", "✗".red().bold(), counts.red().bold());
    } else {
        println!("\n{} {}\n", "✓".green().bold(), counts.green().bold());
    }
}

/// Pretty JSON rendering of the whole report
pub fn to_json(report: &RunReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Write the JSON report to `path`
pub fn write_json(report: &RunReport, path: &Path) -> Result<()> {
    let json = to_json(report)?;
    std::fs::write(path, json).map_err(|e| Error::ReportWrite {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    tracing::info!("JSON report saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::Summary;

    fn report(failed: usize, skipped: usize) -> RunReport {
        RunReport {
            suite: "auth".to_string(),
            base_url: "http://localhost:8080/".to_string(),
            started_at: "2025-09-23T10:00:00+00:00".to_string(),
            finished_at: "2025-09-23T10:00:01+00:00".to_string(),
            outcomes: Vec::new(),
            summary: Summary {
                total: 4,
                passed: 4 - failed - skipped,
                failed,
                skipped,
            },
        }
    }

    #[test]
    fn test_exit_code_reflects_failures_only() {
        assert_eq!(exit_code(&report(0, 0)), EXIT_OK);
        assert_eq!(exit_code(&report(0, 3)), EXIT_OK);
        assert_eq!(exit_code(&report(1, 2)), EXIT_FAILED);
    }

    #[test]
    fn test_write_json_roundtrips_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_json(&report(1, 0), &path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["summary"]["failed"], 1);
        assert_eq!(written["suite"], "auth");
    }

    #[test]
    fn test_write_json_to_missing_dir_is_report_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.json");
        assert!(matches!(
            write_json(&report(0, 0), &path),
            Err(Error::ReportWrite { .. })
        ));
    }
}
