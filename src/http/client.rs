//! REST and GraphQL transport against the pet-store backend
//!
//! Every call is single-shot: no retries and no timeout beyond the
//! transport default. Failures are folded into [`RequestResult`] so nothing
//! propagates to the scenario as an error.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde_json::{json, Value};

use crate::common::{Config, Error, RequestError, Result};

use super::result::{RequestOptions, RequestResult};

/// HTTP client bound to one backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    graphql_url: String,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`
    pub fn new(base_url: Url, graphql_path: &str) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        let graphql_url = join_url(&base_url, graphql_path);

        Ok(Self {
            http,
            base_url,
            graphql_url,
        })
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.base_url()?, &config.backend.graphql_path)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn graphql_url(&self) -> &str {
        &self.graphql_url
    }

    /// Absolute URL for a backend path; absolute URLs pass through
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Issue one REST call and normalize the outcome
    ///
    /// Caller headers are merged over `Content-Type: application/json`.
    pub async fn request(&self, url: &str, options: RequestOptions) -> RequestResult {
        let RequestOptions {
            method,
            headers: caller_headers,
            body,
        } = options;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(caller_headers);

        tracing::debug!("{} {}", method, url);

        let mut builder = self.http.request(method.clone(), url).headers(headers);
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("{} {} failed: {}", method, url, e);
                return RequestResult::failed(None, RequestError::Transport(e.to_string()));
            }
        };

        let status = response.status().as_u16();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                return RequestResult::failed(Some(status), RequestError::Transport(e.to_string()))
            }
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(data) => {
                tracing::debug!("{} {} -> {}", method, url, status);
                RequestResult::Completed { status, data }
            }
            Err(e) => {
                tracing::debug!("{} {} -> {} with non-JSON body", method, url, status);
                RequestResult::failed(Some(status), RequestError::Decode(e.to_string()))
            }
        }
    }

    /// POST `{query, variables}` to the GraphQL endpoint
    ///
    /// A non-empty `errors` array makes the call a failure even on HTTP 200.
    /// On 2xx the returned data is the GraphQL `data` object.
    pub async fn graphql_request(
        &self,
        query: &str,
        variables: Option<Value>,
        token: Option<&str>,
    ) -> RequestResult {
        let mut options = RequestOptions::post(json!({
            "query": query,
            "variables": variables.unwrap_or_else(|| json!({})),
        }));

        if let Some(token) = token {
            match bearer(token) {
                Ok(value) => {
                    options.headers.insert(AUTHORIZATION, value);
                }
                Err(e) => return RequestResult::failed(None, e),
            }
        }

        let result = self.request(&self.graphql_url, options).await;
        interpret_graphql(result)
    }
}

/// `Authorization` header value for a bearer token
pub(crate) fn bearer(token: &str) -> std::result::Result<HeaderValue, RequestError> {
    HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
        RequestError::Transport("token contains characters not allowed in a header".to_string())
    })
}

/// Apply GraphQL response semantics to a raw REST result
pub(crate) fn interpret_graphql(result: RequestResult) -> RequestResult {
    let (status, body) = match result {
        RequestResult::Completed { status, data } => (status, data),
        failed => return failed,
    };

    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        if let Some(first) = errors.first() {
            let message = first
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown GraphQL error")
                .to_string();
            tracing::debug!("GraphQL errors ({}): {}", errors.len(), message);
            return RequestResult::failed(Some(status), RequestError::GraphQl(message));
        }
    }

    if (200..=299).contains(&status) {
        let data = body.get("data").cloned().unwrap_or(Value::Null);
        RequestResult::Completed { status, data }
    } else {
        RequestResult::Completed { status, data: body }
    }
}

fn join_url(base: &Url, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.as_str().trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(Url::parse(base).unwrap(), "/graphql").unwrap()
    }

    #[test]
    fn test_url_joining() {
        let api = client("http://localhost:8080");
        assert_eq!(
            api.url("/api/products"),
            "http://localhost:8080/api/products"
        );
        assert_eq!(
            api.url("api/products"),
            "http://localhost:8080/api/products"
        );
        assert_eq!(api.graphql_url(), "http://localhost:8080/graphql");

        let prefixed = client("http://host/petstore/");
        assert_eq!(
            prefixed.url("/api/promotions"),
            "http://host/petstore/api/promotions"
        );
        assert_eq!(
            prefixed.url("https://other.example/x"),
            "https://other.example/x"
        );
    }

    #[test]
    fn test_graphql_errors_fail_even_on_200() {
        let raw = RequestResult::Completed {
            status: 200,
            data: json!({
                "data": null,
                "errors": [{"message": "Unauthorized"}, {"message": "second"}]
            }),
        };
        let result = interpret_graphql(raw);
        assert!(!result.success());
        assert_eq!(result.status(), Some(200));
        assert_eq!(
            result.error(),
            Some(&RequestError::GraphQl("Unauthorized".to_string()))
        );
    }

    #[test]
    fn test_graphql_empty_errors_unwraps_data() {
        let raw = RequestResult::Completed {
            status: 200,
            data: json!({"data": {"categories": []}, "errors": []}),
        };
        let result = interpret_graphql(raw);
        assert!(result.success());
        assert_eq!(result.data(), Some(&json!({"categories": []})));
    }

    #[test]
    fn test_graphql_non_2xx_keeps_body() {
        let raw = RequestResult::Completed {
            status: 500,
            data: json!({"message": "boom"}),
        };
        let result = interpret_graphql(raw);
        assert!(!result.success());
        assert_eq!(result.data(), Some(&json!({"message": "boom"})));
    }

    #[test]
    fn test_bearer_rejects_control_characters() {
        assert!(bearer("abc.def").is_ok());
        assert!(bearer("bad\ntoken").is_err());
    }
}
