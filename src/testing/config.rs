//! Scenario file configuration types
//!
//! Defines the data structures for deserializing YAML scenario files.

use serde::Deserialize;
use serde_json::Value;

/// A complete scenario loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct ScenarioFile {
    /// Name of the scenario
    pub name: String,
    /// Optional description of what the scenario verifies
    pub description: Option<String>,
    /// Skip the scenario unless an earlier one left an authenticated session
    #[serde(default)]
    pub requires_session: bool,
    /// The sequence of steps to execute
    pub steps: Vec<ScenarioStep>,
}

/// Which login endpoint a login step uses
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoginVia {
    #[default]
    Rest,
    Graphql,
}

/// A single step in the execution flow
#[derive(Deserialize, Debug)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Log in and keep the token for later `auth: true` steps
    Login {
        /// Overrides the configured email
        email: Option<String>,
        /// Overrides the configured password
        password: Option<String>,
        #[serde(default)]
        via: LoginVia,
    },
    /// Issue a REST call
    Rest {
        /// HTTP method (default: GET)
        #[serde(default = "default_method")]
        method: String,
        /// Path relative to the base URL, or an absolute URL
        path: String,
        /// Send the session's bearer token
        #[serde(default)]
        auth: bool,
        /// JSON body
        body: Option<Value>,
        /// Expectations for the result (default: success)
        expect: Option<Expectation>,
    },
    /// Issue a GraphQL call
    Graphql {
        query: String,
        variables: Option<Value>,
        /// Send the session's bearer token
        #[serde(default)]
        auth: bool,
        /// Expectations for the result (default: success)
        expect: Option<Expectation>,
    },
}

fn default_method() -> String {
    "GET".to_string()
}

/// Expectations for a request result
#[derive(Deserialize, Debug, Default)]
pub struct Expectation {
    /// Accepted HTTP statuses (any of)
    pub status: Option<Vec<u16>>,
    /// Whether the request should succeed
    pub success: Option<bool>,
    /// JSON pointer into the data that must address an array ("" = data)
    pub array_at: Option<String>,
    /// Substring of the serialized data
    pub contains: Option<String>,
    /// Substring of the error message
    pub error_contains: Option<String>,
}
