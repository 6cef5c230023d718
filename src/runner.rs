//! Sequential scenario runner
//!
//! The runner owns the [`Session`] for a run and lends it to each scenario.
//! Scenarios never raise: they return a [`Verdict`], and the runner turns it
//! into a [`ScenarioOutcome`]. Scenarios that need a session are skipped,
//! not failed, when none is held.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::common::Credentials;
use crate::http::{ApiClient, Session};

/// Everything a scenario may touch while it runs
pub struct ScenarioContext<'a> {
    pub client: &'a ApiClient,
    pub session: &'a mut Session,
    pub credentials: &'a Credentials,
}

/// One self-contained check against the backend
#[async_trait]
pub trait Scenario: Send + Sync {
    /// Stable identifier, used by `--only` and in reports
    fn name(&self) -> &str;

    /// Whether the scenario needs an authenticated session to run
    fn requires_session(&self) -> bool;

    /// One-line summary for `list`
    fn description(&self) -> &str {
        ""
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Verdict;
}

/// Pass/fail decision produced by a scenario
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub passed: bool,
    pub message: String,
    pub detail: Option<Value>,
}

impl Verdict {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            detail: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Passed,
    Failed,
    Skipped,
}

/// Recorded result of one scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub status: OutcomeStatus,
    pub message: String,
    pub detail: Option<Value>,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.status == OutcomeStatus::Passed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Structured result of a whole run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub suite: String,
    pub base_url: String,
    pub started_at: String,
    pub finished_at: String,
    pub outcomes: Vec<ScenarioOutcome>,
    pub summary: Summary,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }
}

/// Drives scenarios one after another against a single backend
pub struct Runner {
    client: ApiClient,
    credentials: Credentials,
    session: Session,
}

impl Runner {
    pub fn new(client: ApiClient, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run every scenario in order
    ///
    /// `observe` sees each outcome as soon as it is recorded. A failing
    /// scenario never stops the run.
    pub async fn run<F>(
        &mut self,
        suite: &str,
        scenarios: &[Box<dyn Scenario>],
        mut observe: F,
    ) -> RunReport
    where
        F: FnMut(&ScenarioOutcome),
    {
        let started_at = Utc::now().to_rfc3339();
        let mut outcomes = Vec::with_capacity(scenarios.len());

        tracing::info!(
            "Running {} scenario(s) from '{}' against {}",
            scenarios.len(),
            suite,
            self.client.base_url()
        );

        for scenario in scenarios {
            let outcome = self.run_one(scenario.as_ref()).await;
            observe(&outcome);
            outcomes.push(outcome);
        }

        let summary = summarize(&outcomes);
        tracing::info!(
            "Finished '{}': {} passed, {} failed, {} skipped",
            suite,
            summary.passed,
            summary.failed,
            summary.skipped
        );

        RunReport {
            suite: suite.to_string(),
            base_url: self.client.base_url().to_string(),
            started_at,
            finished_at: Utc::now().to_rfc3339(),
            outcomes,
            summary,
        }
    }

    async fn run_one(&mut self, scenario: &dyn Scenario) -> ScenarioOutcome {
        let name = scenario.name().to_string();

        if scenario.requires_session() && !self.session.is_authenticated() {
            tracing::info!("Skipping '{}': no authenticated session", name);
            return ScenarioOutcome {
                name,
                status: OutcomeStatus::Skipped,
                message: "skipped: no authenticated session".to_string(),
                detail: None,
            };
        }

        tracing::debug!("Starting scenario '{}'", name);
        let mut ctx = ScenarioContext {
            client: &self.client,
            session: &mut self.session,
            credentials: &self.credentials,
        };
        let verdict = scenario.run(&mut ctx).await;

        if verdict.passed {
            tracing::info!("'{}' passed: {}", name, verdict.message);
        } else {
            tracing::warn!("'{}' failed: {}", name, verdict.message);
        }

        ScenarioOutcome {
            name,
            status: if verdict.passed {
                OutcomeStatus::Passed
            } else {
                OutcomeStatus::Failed
            },
            message: verdict.message,
            detail: verdict.detail,
        }
    }
}

fn summarize(outcomes: &[ScenarioOutcome]) -> Summary {
    let mut summary = Summary {
        total: outcomes.len(),
        ..Summary::default()
    };
    for outcome in outcomes {
        match outcome.status {
            OutcomeStatus::Passed => summary.passed += 1,
            OutcomeStatus::Failed => summary.failed += 1,
            OutcomeStatus::Skipped => summary.skipped += 1,
        }
    }
    summary
}
