//! Login, token verification and access-control scenarios

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::common::{truncate_token, Credentials};
use crate::http::{ApiClient, RequestOptions, Session};
use crate::runner::{Scenario, ScenarioContext, Verdict};

use super::request_failure;

const LOGIN_MUTATION: &str = r#"
    mutation Login($email: String!, $password: String!) {
        login(email: $email, password: $password) {
            success
            token
            user {
                userId
                userName
                email
                role {
                    roleId
                    roleName
                }
            }
        }
    }
"#;

/// Log in through `POST /api/auth/login` and store the token in `session`
pub async fn rest_login(
    client: &ApiClient,
    session: &mut Session,
    credentials: &Credentials,
) -> Verdict {
    let url = client.url("/api/auth/login");
    let body = json!({
        "email": credentials.email,
        "password": credentials.password,
    });
    let result = client.request(&url, RequestOptions::post(body)).await;

    let token = result
        .pointer("/token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty());

    match token {
        Some(token) if result.success() => {
            let user = result.pointer("/user").cloned();
            let detail = json!({ "token": truncate_token(token), "user": user });
            session.authenticate(token, user);
            Verdict::pass("REST login succeeded, token received").with_detail(detail)
        }
        _ => Verdict::fail(request_failure("REST login failed", &result))
            .with_detail(result.to_json()),
    }
}

/// Log in through the GraphQL `login` mutation and store the token in `session`
pub async fn graphql_login(
    client: &ApiClient,
    session: &mut Session,
    credentials: &Credentials,
) -> Verdict {
    let variables = json!({
        "email": credentials.email,
        "password": credentials.password,
    });
    let result = client
        .graphql_request(LOGIN_MUTATION, Some(variables), None)
        .await;

    let accepted = result.pointer("/login/success").and_then(Value::as_bool) == Some(true);
    let token = result
        .pointer("/login/token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty());

    match token {
        Some(token) if result.success() && accepted => {
            let user = result.pointer("/login/user").cloned();
            let detail = json!({ "token": truncate_token(token), "user": user });
            session.authenticate(token, user);
            Verdict::pass("GraphQL login succeeded").with_detail(detail)
        }
        _ => Verdict::fail(request_failure("GraphQL login failed", &result))
            .with_detail(result.to_json()),
    }
}

pub struct RestLogin;

#[async_trait]
impl Scenario for RestLogin {
    fn name(&self) -> &str {
        "rest-login"
    }

    fn requires_session(&self) -> bool {
        false
    }

    fn description(&self) -> &str {
        "POST /api/auth/login with the configured credentials"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Verdict {
        rest_login(ctx.client, ctx.session, ctx.credentials).await
    }
}

pub struct GraphqlLogin;

#[async_trait]
impl Scenario for GraphqlLogin {
    fn name(&self) -> &str {
        "graphql-login"
    }

    fn requires_session(&self) -> bool {
        false
    }

    fn description(&self) -> &str {
        "GraphQL login mutation with the configured credentials"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Verdict {
        graphql_login(ctx.client, ctx.session, ctx.credentials).await
    }
}

pub struct VerifyToken;

#[async_trait]
impl Scenario for VerifyToken {
    fn name(&self) -> &str {
        "verify-token"
    }

    fn requires_session(&self) -> bool {
        true
    }

    fn description(&self) -> &str {
        "GET /api/auth/verify with the session token"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Verdict {
        let url = ctx.client.url("/api/auth/verify");
        let result = ctx
            .client
            .authenticated_request(ctx.session, &url, RequestOptions::get())
            .await;

        if result.status() == Some(200) {
            Verdict::pass("Token is valid").with_detail(result.to_json())
        } else {
            Verdict::fail(request_failure("Token rejected", &result)).with_detail(result.to_json())
        }
    }
}

pub struct CurrentUser;

#[async_trait]
impl Scenario for CurrentUser {
    fn name(&self) -> &str {
        "current-user"
    }

    fn requires_session(&self) -> bool {
        true
    }

    fn description(&self) -> &str {
        "GET /api/auth/me returns the logged-in profile"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Verdict {
        let url = ctx.client.url("/api/auth/me");
        let result = ctx
            .client
            .authenticated_request(ctx.session, &url, RequestOptions::get())
            .await;

        match result.data() {
            Some(profile) if result.status() == Some(200) && profile.is_object() => {
                Verdict::pass("Fetched current user profile").with_detail(profile.clone())
            }
            Some(_) if result.status() == Some(200) => {
                Verdict::fail("Profile endpoint answered 200 without a user object")
                    .with_detail(result.to_json())
            }
            _ => Verdict::fail(request_failure("Could not fetch profile", &result))
                .with_detail(result.to_json()),
        }
    }
}

/// A protected endpoint must refuse a request that carries no token
pub struct WithoutToken;

#[async_trait]
impl Scenario for WithoutToken {
    fn name(&self) -> &str {
        "without-token"
    }

    fn requires_session(&self) -> bool {
        false
    }

    fn description(&self) -> &str {
        "GET /api/auth/me without a token must answer 401 or 403"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Verdict {
        let url = ctx.client.url("/api/auth/me");
        let result = ctx.client.request(&url, RequestOptions::get()).await;

        match result.status() {
            Some(status @ (401 | 403)) => {
                Verdict::pass(format!("Correctly blocked without token (HTTP {})", status))
            }
            Some(status) => Verdict::fail(format!(
                "Regression: protected endpoint answered HTTP {} without a token",
                status
            ))
            .with_detail(result.to_json()),
            None => Verdict::fail(request_failure("Request failed", &result)),
        }
    }
}
