//! Session state and the authenticated request helpers
//!
//! The session is owned by the runner and lent to each authenticated call.
//! Invalidation on 401/403 happens here and nowhere else.

use reqwest::header::{HeaderMap, AUTHORIZATION};
use serde_json::Value;

use crate::common::RequestError;

use super::client::{bearer, ApiClient};
use super::result::{RequestOptions, RequestResult};

/// Bearer token and user profile obtained at login
///
/// Lives for one run only; nothing is persisted.
#[derive(Debug, Default)]
pub struct Session {
    token: Option<String>,
    user: Option<Value>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the token (and profile) returned by a successful login
    pub fn authenticate(&mut self, token: impl Into<String>, user: Option<Value>) {
        self.token = Some(token.into());
        self.user = user;
    }

    /// Drop the held token and profile
    pub fn invalidate(&mut self) {
        if self.token.take().is_some() {
            tracing::info!("Session invalidated");
        }
        self.user = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&Value> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl ApiClient {
    /// REST call carrying the session's bearer token
    ///
    /// Without a token no call is made. A 401/403 answer invalidates the
    /// session and is reported as `session expired`.
    pub async fn authenticated_request(
        &self,
        session: &mut Session,
        url: &str,
        options: RequestOptions,
    ) -> RequestResult {
        let authorization = match session.token() {
            Some(token) => bearer(token),
            None => {
                tracing::warn!("No session token, not calling {}", url);
                return RequestResult::failed(None, RequestError::NotAuthenticated);
            }
        };
        let authorization = match authorization {
            Ok(value) => value,
            Err(e) => return RequestResult::failed(None, e),
        };

        let RequestOptions {
            method,
            headers: caller_headers,
            body,
        } = options;

        // Replaces per name, so a caller-supplied Authorization wins
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.extend(caller_headers);

        let options = RequestOptions {
            method,
            headers,
            body,
        };
        let result = self.request(url, options).await;
        expire_on_rejection(session, result)
    }

    /// GraphQL call carrying the session's bearer token
    pub async fn authenticated_graphql(
        &self,
        session: &mut Session,
        query: &str,
        variables: Option<Value>,
    ) -> RequestResult {
        let Some(token) = session.token().map(str::to_owned) else {
            tracing::warn!("No session token, not calling {}", self.graphql_url());
            return RequestResult::failed(None, RequestError::NotAuthenticated);
        };

        let result = self.graphql_request(query, variables, Some(&token)).await;
        expire_on_rejection(session, result)
    }
}

fn expire_on_rejection(session: &mut Session, result: RequestResult) -> RequestResult {
    match result.status() {
        Some(status @ (401 | 403)) => {
            tracing::warn!("Backend rejected session token with HTTP {}", status);
            session.invalidate();
            RequestResult::failed(Some(status), RequestError::SessionExpired)
        }
        _ => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_lifecycle() {
        let mut session = Session::new();
        assert!(!session.is_authenticated());

        session.authenticate("tok", Some(json!({"userId": 1})));
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("tok"));
        assert_eq!(session.user(), Some(&json!({"userId": 1})));

        session.invalidate();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_rejection_statuses_expire_session() {
        for status in [401u16, 403] {
            let mut session = Session::new();
            session.authenticate("tok", None);
            let raw = RequestResult::Completed {
                status,
                data: json!({}),
            };
            let result = expire_on_rejection(&mut session, raw);
            assert_eq!(result.error(), Some(&RequestError::SessionExpired));
            assert_eq!(result.status(), Some(status));
            assert!(!session.is_authenticated());
        }
    }

    #[test]
    fn test_other_statuses_pass_through() {
        let mut session = Session::new();
        session.authenticate("tok", None);
        let raw = RequestResult::Completed {
            status: 500,
            data: json!({"success": false}),
        };
        let result = expire_on_rejection(&mut session, raw.clone());
        assert_eq!(result, raw);
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_rejection_without_json_body_still_expires() {
        let mut session = Session::new();
        session.authenticate("tok", None);
        let raw = RequestResult::failed(Some(403), RequestError::Decode("EOF".into()));
        let result = expire_on_rejection(&mut session, raw);
        assert_eq!(result.error(), Some(&RequestError::SessionExpired));
        assert!(!session.is_authenticated());
    }
}
