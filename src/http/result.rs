//! Normalized outcome of a single backend call

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use crate::common::RequestError;

/// What a request produced
///
/// Either the backend answered with a JSON body, or the call failed and only
/// an error is available. A failure may still carry the HTTP status that was
/// received (malformed body, expired session, GraphQL errors).
#[derive(Debug, Clone, PartialEq)]
pub enum RequestResult {
    Completed {
        status: u16,
        data: Value,
    },
    Failed {
        status: Option<u16>,
        error: RequestError,
    },
}

impl RequestResult {
    pub(crate) fn failed(status: Option<u16>, error: RequestError) -> Self {
        Self::Failed { status, error }
    }

    /// True only for a completed 2xx response
    pub fn success(&self) -> bool {
        match self {
            Self::Completed { status, .. } => (200..=299).contains(status),
            Self::Failed { .. } => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Completed { status, .. } => Some(*status),
            Self::Failed { status, .. } => *status,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Completed { data, .. } => Some(data),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&RequestError> {
        match self {
            Self::Completed { .. } => None,
            Self::Failed { error, .. } => Some(error),
        }
    }

    /// Look up a value inside the response data by JSON pointer
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.data().and_then(|data| data.pointer(pointer))
    }

    /// Short human-readable description for log lines
    pub fn describe(&self) -> String {
        match self {
            Self::Completed { status, .. } => format!("HTTP {}", status),
            Self::Failed {
                status: Some(status),
                error,
            } => format!("HTTP {}: {}", status, error),
            Self::Failed {
                status: None,
                error,
            } => error.to_string(),
        }
    }

    /// `{status, data, success}` or `{status?, error, success: false}`
    pub fn to_json(&self) -> Value {
        match self {
            Self::Completed { status, data } => json!({
                "status": status,
                "data": data,
                "success": self.success(),
            }),
            Self::Failed { status, error } => {
                let mut value = json!({
                    "error": error.to_string(),
                    "code": error.code(),
                    "success": false,
                });
                if let Some(status) = status {
                    value["status"] = json!(status);
                }
                value
            }
        }
    }
}

impl Serialize for RequestResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Method, extra headers and optional JSON body for a REST call
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_tracks_2xx_only() {
        let ok = RequestResult::Completed {
            status: 204,
            data: Value::Null,
        };
        let client_error = RequestResult::Completed {
            status: 404,
            data: json!({"success": false}),
        };
        assert!(ok.success());
        assert!(!client_error.success());
        assert_eq!(client_error.status(), Some(404));
    }

    #[test]
    fn test_failed_has_error_and_no_data() {
        let result = RequestResult::failed(Some(401), RequestError::SessionExpired);
        assert!(!result.success());
        assert!(result.data().is_none());
        assert_eq!(result.error(), Some(&RequestError::SessionExpired));
        assert_eq!(result.describe(), "HTTP 401: session expired");
    }

    #[test]
    fn test_json_shape_populates_exactly_one_of_data_and_error() {
        let completed = RequestResult::Completed {
            status: 200,
            data: json!([1, 2]),
        }
        .to_json();
        assert_eq!(completed["success"], json!(true));
        assert!(completed.get("data").is_some());
        assert!(completed.get("error").is_none());

        let transport =
            RequestResult::failed(None, RequestError::Transport("refused".into())).to_json();
        assert_eq!(transport["error"], json!("refused"));
        assert_eq!(transport["success"], json!(false));
        assert!(transport.get("data").is_none());
        assert!(transport.get("status").is_none());
    }

    #[test]
    fn test_options_default_to_get_without_body() {
        let options = RequestOptions::get();
        assert_eq!(options.method, Method::GET);
        assert!(options.body.is_none());
        assert!(options.headers.is_empty());

        let options = RequestOptions::post(json!({"a": 1})).with_method(Method::PUT);
        assert_eq!(options.method, Method::PUT);
        assert_eq!(options.body, Some(json!({"a": 1})));
    }
}
