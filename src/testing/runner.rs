//! Scenario file execution
//!
//! A YAML file becomes one [`Scenario`]: its steps run in order against the
//! same client and session as the built-in scenarios, and the first failing
//! step fails the scenario.

use std::path::Path;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

use crate::common::{Credentials, Error, Result};
use crate::http::{RequestOptions, RequestResult};
use crate::runner::{Scenario, ScenarioContext, Verdict};
use crate::scenarios::{graphql_login, rest_login};

use super::config::{Expectation, LoginVia, ScenarioFile, ScenarioStep};

/// A scenario loaded from a YAML file
#[derive(Debug)]
pub struct FileScenario {
    file: ScenarioFile,
}

impl FileScenario {
    pub fn steps(&self) -> usize {
        self.file.steps.len()
    }
}

/// Load and validate a scenario file
pub fn load_scenario(path: &Path) -> Result<FileScenario> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    parse_scenario(path, &content)
}

/// Parse and validate scenario YAML; `path` is only used in error messages
pub fn parse_scenario(path: &Path, content: &str) -> Result<FileScenario> {
    let file: ScenarioFile =
        serde_yaml::from_str(content).map_err(|e| Error::scenario_parse(path, e))?;

    if file.steps.is_empty() {
        return Err(Error::scenario_parse(path, "scenario has no steps"));
    }

    for (i, step) in file.steps.iter().enumerate() {
        if let ScenarioStep::Rest { method, .. } = step {
            parse_method(method).map_err(|reason| {
                Error::scenario_parse(path, format!("step {}: {}", i + 1, reason))
            })?;
        }
    }

    tracing::debug!("Loaded scenario '{}' from {}", file.name, path.display());
    Ok(FileScenario { file })
}

fn parse_method(method: &str) -> std::result::Result<Method, String> {
    Method::from_bytes(method.trim().to_uppercase().as_bytes())
        .map_err(|_| format!("invalid HTTP method '{}'", method))
}

#[async_trait]
impl Scenario for FileScenario {
    fn name(&self) -> &str {
        &self.file.name
    }

    fn requires_session(&self) -> bool {
        self.file.requires_session
    }

    fn description(&self) -> &str {
        self.file.description.as_deref().unwrap_or("")
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Verdict {
        let mut passed = Vec::with_capacity(self.file.steps.len());

        for (i, step) in self.file.steps.iter().enumerate() {
            let step_num = i + 1;
            match execute_step(ctx, step).await {
                Ok(label) => {
                    tracing::debug!("Step {}: {}", step_num, label);
                    passed.push(label);
                }
                Err(message) => {
                    return Verdict::fail(format!("Step {}: {}", step_num, message))
                        .with_detail(json!({ "passedSteps": passed }));
                }
            }
        }

        Verdict::pass(format!("{} step(s) passed", passed.len()))
            .with_detail(json!({ "passedSteps": passed }))
    }
}

/// Execute a single step; `Ok` carries a label for the report
async fn execute_step(
    ctx: &mut ScenarioContext<'_>,
    step: &ScenarioStep,
) -> std::result::Result<String, String> {
    match step {
        ScenarioStep::Login {
            email,
            password,
            via,
        } => {
            let credentials = Credentials {
                email: email
                    .clone()
                    .unwrap_or_else(|| ctx.credentials.email.clone()),
                password: password
                    .clone()
                    .unwrap_or_else(|| ctx.credentials.password.clone()),
            };
            let verdict = match via {
                LoginVia::Rest => rest_login(ctx.client, ctx.session, &credentials).await,
                LoginVia::Graphql => graphql_login(ctx.client, ctx.session, &credentials).await,
            };
            if verdict.passed {
                Ok(format!("login as {}", credentials.email))
            } else {
                Err(verdict.message)
            }
        }

        ScenarioStep::Rest {
            method,
            path,
            auth,
            body,
            expect,
        } => {
            let method = parse_method(method)?;
            let url = ctx.client.url(path);
            let mut options = RequestOptions::get().with_method(method.clone());
            if let Some(body) = body {
                options = options.with_body(body.clone());
            }

            let result = if *auth {
                ctx.client
                    .authenticated_request(ctx.session, &url, options)
                    .await
            } else {
                ctx.client.request(&url, options).await
            };

            let label = format!("{} {} ({})", method, path, result.describe());
            check_expectation(&result, expect.as_ref())
                .map(|()| label.clone())
                .map_err(|e| format!("{}: {}", label, e))
        }

        ScenarioStep::Graphql {
            query,
            variables,
            auth,
            expect,
        } => {
            let result = if *auth {
                ctx.client
                    .authenticated_graphql(ctx.session, query, variables.clone())
                    .await
            } else {
                ctx.client
                    .graphql_request(query, variables.clone(), None)
                    .await
            };

            let label = format!("graphql ({})", result.describe());
            check_expectation(&result, expect.as_ref())
                .map(|()| label.clone())
                .map_err(|e| format!("{}: {}", label, e))
        }
    }
}

/// Compare a result against a step's expectations
///
/// Without an explicit `success`, `status` or `error_contains`, the request
/// is expected to succeed.
pub(crate) fn check_expectation(
    result: &RequestResult,
    expect: Option<&Expectation>,
) -> std::result::Result<(), String> {
    let default = Expectation::default();
    let expect = expect.unwrap_or(&default);

    let implicit = expect.status.is_none() && expect.error_contains.is_none();
    let expected_success = expect.success.or(implicit.then_some(true));

    if let Some(should_succeed) = expected_success {
        if result.success() != should_succeed {
            return Err(format!(
                "expected success={}, got success={}",
                should_succeed,
                result.success()
            ));
        }
    }

    if let Some(statuses) = &expect.status {
        let Some(status) = result.status() else {
            return Err(format!("expected status in {:?}, got no response", statuses));
        };
        if !statuses.contains(&status) {
            return Err(format!("expected status in {:?}, got {}", statuses, status));
        }
    }

    if let Some(pointer) = &expect.array_at {
        if crate::scenarios::array_at(result, pointer).is_none() {
            return Err(format!("expected an array at '{}'", pointer));
        }
    }

    if let Some(expected_substr) = &expect.contains {
        let data = result.data().map(|d| d.to_string()).unwrap_or_default();
        if !data.contains(expected_substr.as_str()) {
            return Err(format!(
                "data does not contain '{}'. Got: '{}'",
                expected_substr,
                if data.len() > 200 {
                    format!("{}...", data.chars().take(200).collect::<String>())
                } else {
                    data
                }
            ));
        }
    }

    if let Some(expected_substr) = &expect.error_contains {
        let error = result.error().map(|e| e.to_string()).unwrap_or_default();
        if !error.contains(expected_substr.as_str()) {
            return Err(format!(
                "expected error containing '{}', got '{}'",
                expected_substr, error
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RequestError;
    use serde_json::Value;

    const SCENARIO: &str = r#"
name: Promotions smoke
description: Log in and list promotions
steps:
  - action: login
    via: graphql
  - action: rest
    path: /api/promotions
    auth: true
    expect:
      status: [200]
      array_at: ""
  - action: graphql
    query: "query { categories { categoryId } }"
    auth: true
    expect:
      array_at: /categories
"#;

    #[test]
    fn test_parse_scenario_file() {
        let scenario = parse_scenario(Path::new("smoke.yaml"), SCENARIO).unwrap();
        assert_eq!(scenario.name(), "Promotions smoke");
        assert_eq!(scenario.description(), "Log in and list promotions");
        assert!(!scenario.requires_session());
        assert_eq!(scenario.steps(), 3);

        match &scenario.file.steps[0] {
            ScenarioStep::Login { via, email, .. } => {
                assert_eq!(*via, LoginVia::Graphql);
                assert!(email.is_none());
            }
            other => panic!("Expected login step, got {:?}", other),
        }
        match &scenario.file.steps[1] {
            ScenarioStep::Rest { method, auth, .. } => {
                assert_eq!(method, "GET");
                assert!(*auth);
            }
            other => panic!("Expected rest step, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_method_and_empty_steps() {
        let bad_method = "name: x\nsteps:\n  - action: rest\n    method: \"GE T\"\n    path: /\n";
        let err = parse_scenario(Path::new("x.yaml"), bad_method).unwrap_err();
        assert!(matches!(err, Error::ScenarioParse { .. }));
        assert!(err.to_string().contains("step 1"));

        let empty = "name: x\nsteps: []\n";
        assert!(parse_scenario(Path::new("x.yaml"), empty).is_err());

        let unknown_action = "name: x\nsteps:\n  - action: teleport\n";
        assert!(parse_scenario(Path::new("x.yaml"), unknown_action).is_err());
    }

    fn completed(status: u16, data: Value) -> RequestResult {
        RequestResult::Completed { status, data }
    }

    #[test]
    fn test_default_expectation_is_success() {
        assert!(check_expectation(&completed(200, json!({})), None).is_ok());
        assert!(check_expectation(&completed(500, json!({})), None).is_err());
    }

    #[test]
    fn test_status_expectation_allows_failure() {
        let expect = Expectation {
            status: Some(vec![401, 403]),
            ..Expectation::default()
        };
        assert!(check_expectation(&completed(403, json!({})), Some(&expect)).is_ok());
        let err = check_expectation(&completed(200, json!({})), Some(&expect)).unwrap_err();
        assert!(err.contains("got 200"));
    }

    #[test]
    fn test_array_and_contains_expectations() {
        let result = completed(200, json!({"promotions": [{"promotionName": "Summer"}]}));
        let expect = Expectation {
            array_at: Some("/promotions".to_string()),
            contains: Some("Summer".to_string()),
            ..Expectation::default()
        };
        assert!(check_expectation(&result, Some(&expect)).is_ok());

        let expect = Expectation {
            array_at: Some("".to_string()),
            ..Expectation::default()
        };
        assert!(check_expectation(&result, Some(&expect)).is_err());
    }

    #[test]
    fn test_error_contains_expectation() {
        let result = RequestResult::Failed {
            status: Some(200),
            error: RequestError::GraphQl("Category not found".to_string()),
        };
        let expect = Expectation {
            error_contains: Some("not found".to_string()),
            ..Expectation::default()
        };
        assert!(check_expectation(&result, Some(&expect)).is_ok());
    }
}
