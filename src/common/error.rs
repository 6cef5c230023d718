//! Error types for the harness
//!
//! Two layers live here. [`Error`] covers harness failures that stop a run
//! before or after scenarios execute (configuration, scenario files, report
//! output). [`RequestError`] is the per-request taxonomy carried inside a
//! [`RequestResult`](crate::http::RequestResult); it never escapes a scenario.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    // === Scenario Errors ===
    #[error("Invalid scenario file '{path}': {reason}")]
    ScenarioParse { path: String, reason: String },

    #[error("Unknown scenario '{0}'. Use 'petstore-harness list' to see available scenarios")]
    UnknownScenario(String),

    // === IO Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    #[error("Failed to write report '{path}': {error}")]
    ReportWrite { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid URL error
    pub fn invalid_url(url: &str, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a scenario parse error
    pub fn scenario_parse(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::ScenarioParse {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Why a single backend request did not produce usable data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Network unreachable, DNS, TLS, or the connection dropped mid-body
    #[error("{0}")]
    Transport(String),

    /// The backend answered but the body was not valid JSON
    #[error("malformed response body: {0}")]
    Decode(String),

    /// No token was held, so no call was made
    #[error("not authenticated")]
    NotAuthenticated,

    /// The backend rejected a previously valid token with 401/403
    #[error("session expired")]
    SessionExpired,

    /// GraphQL returned a non-empty `errors` array; holds the first message
    #[error("{0}")]
    GraphQl(String),
}

impl RequestError {
    /// Stable machine-readable code used in JSON reports
    pub fn code(&self) -> &'static str {
        match self {
            RequestError::Transport(_) => "TRANSPORT",
            RequestError::Decode(_) => "DECODE",
            RequestError::NotAuthenticated => "NOT_AUTHENTICATED",
            RequestError::SessionExpired => "SESSION_EXPIRED",
            RequestError::GraphQl(_) => "GRAPHQL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_session_errors_have_fixed_messages() {
        assert_eq!(
            RequestError::NotAuthenticated.to_string(),
            "not authenticated"
        );
        assert_eq!(RequestError::SessionExpired.to_string(), "session expired");
    }

    #[test]
    fn test_graphql_error_surfaces_server_message() {
        let err = RequestError::GraphQl("Category not found".to_string());
        assert_eq!(err.to_string(), "Category not found");
        assert_eq!(err.code(), "GRAPHQL");
    }

    #[test]
    fn test_harness_errors_name_their_input() {
        let err = Error::scenario_parse(Path::new("smoke.yaml"), "scenario has no steps");
        assert_eq!(
            err.to_string(),
            "Invalid scenario file 'smoke.yaml': scenario has no steps"
        );

        let err = Error::invalid_url("ftp://host", "unsupported scheme");
        assert_eq!(
            err.to_string(),
            "Invalid base URL 'ftp://host': unsupported scheme"
        );
    }
}
