//! Built-in scenarios and the suites that group them

mod auth;
mod catalog;
mod products;
mod promotions;

use serde_json::Value;

use crate::common::{Error, Result};
use crate::http::RequestResult;
use crate::runner::Scenario;

pub use auth::{graphql_login, rest_login};

/// Named selections of built-in scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Suite {
    /// Every built-in scenario, logins first
    Full,
    /// REST login, token verification, profile and the unauthenticated check
    Auth,
    /// REST and GraphQL login only
    LoginOnly,
    /// GraphQL login followed by the promotion scenarios
    PromotionsOnly,
    /// Public product catalogue endpoints
    Products,
}

impl Suite {
    pub fn name(&self) -> &'static str {
        match self {
            Suite::Full => "full",
            Suite::Auth => "auth",
            Suite::LoginOnly => "login-only",
            Suite::PromotionsOnly => "promotions-only",
            Suite::Products => "products",
        }
    }

    /// Scenarios of this suite in execution order
    pub fn scenarios(&self) -> Vec<Box<dyn Scenario>> {
        match self {
            Suite::Full => vec![
                Box::new(auth::RestLogin),
                Box::new(auth::GraphqlLogin),
                Box::new(auth::VerifyToken),
                Box::new(auth::CurrentUser),
                Box::new(auth::WithoutToken),
                Box::new(promotions::PromotionsRest),
                Box::new(catalog::promotions()),
                Box::new(promotions::CreatePromotion),
                Box::new(catalog::categories()),
                Box::new(catalog::products()),
                Box::new(products::ProductsStatus),
                Box::new(products::all_products()),
                Box::new(products::by_category_id()),
                Box::new(products::by_category_name()),
                Box::new(products::UnknownCategory),
            ],
            Suite::Auth => vec![
                Box::new(auth::RestLogin),
                Box::new(auth::VerifyToken),
                Box::new(auth::CurrentUser),
                Box::new(auth::WithoutToken),
            ],
            Suite::LoginOnly => vec![Box::new(auth::RestLogin), Box::new(auth::GraphqlLogin)],
            Suite::PromotionsOnly => vec![
                Box::new(auth::GraphqlLogin),
                Box::new(catalog::promotions()),
                Box::new(promotions::CreatePromotion),
            ],
            Suite::Products => vec![
                Box::new(products::ProductsStatus),
                Box::new(products::all_products()),
                Box::new(products::by_category_id()),
                Box::new(products::by_category_name()),
                Box::new(products::UnknownCategory),
            ],
        }
    }

    /// Scenarios of this suite restricted to `only` (all when empty)
    ///
    /// Unknown names are an error rather than silently running nothing.
    pub fn select(&self, only: &[String]) -> Result<Vec<Box<dyn Scenario>>> {
        let scenarios = self.scenarios();
        if only.is_empty() {
            return Ok(scenarios);
        }

        for name in only {
            if !scenarios.iter().any(|s| s.name() == name) {
                return Err(Error::UnknownScenario(name.clone()));
            }
        }

        Ok(scenarios
            .into_iter()
            .filter(|s| only.iter().any(|name| name == s.name()))
            .collect())
    }
}

/// The array found at `pointer` in the response data
///
/// An empty pointer addresses the data itself.
pub(crate) fn array_at<'a>(result: &'a RequestResult, pointer: &str) -> Option<&'a Vec<Value>> {
    result.pointer(pointer).and_then(Value::as_array)
}

/// First `n` elements, for report detail
pub(crate) fn sample(items: &[Value], n: usize) -> Value {
    Value::Array(items.iter().take(n).cloned().collect())
}

/// Failure message naming what went wrong with the request
pub(crate) fn request_failure(what: &str, result: &RequestResult) -> String {
    format!("{} ({})", what, result.describe())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_suites_run_logins_first() {
        for suite in [Suite::Full, Suite::Auth, Suite::LoginOnly, Suite::PromotionsOnly] {
            let scenarios = suite.scenarios();
            let first_protected = scenarios.iter().position(|s| s.requires_session());
            let last_login = scenarios.iter().rposition(|s| s.name().ends_with("login"));
            if let (Some(protected), Some(login)) = (first_protected, last_login) {
                assert!(
                    login < protected,
                    "{} runs a protected scenario before login",
                    suite.name()
                );
            }
        }
    }

    #[test]
    fn test_names_are_unique_in_full_suite() {
        let scenarios = Suite::Full.scenarios();
        let mut names: Vec<&str> = scenarios.iter().map(|s| s.name()).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn test_products_suite_needs_no_session() {
        assert!(Suite::Products
            .scenarios()
            .iter()
            .all(|s| !s.requires_session()));
    }

    #[test]
    fn test_select_filters_and_keeps_order() {
        let only = vec!["without-token".to_string(), "rest-login".to_string()];
        let selected = Suite::Auth.select(&only).unwrap();
        let names: Vec<&str> = selected.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["rest-login", "without-token"]);
    }

    #[test]
    fn test_select_rejects_unknown_name() {
        let err = Suite::Products
            .select(&["rest-login".to_string()])
            .err()
            .unwrap();
        assert!(matches!(err, Error::UnknownScenario(name) if name == "rest-login"));
    }

    #[test]
    fn test_array_helpers() {
        let result = RequestResult::Completed {
            status: 200,
            data: json!({"categories": [1, 2, 3, 4]}),
        };
        let items = array_at(&result, "/categories").unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(sample(items, 3), json!([1, 2, 3]));
        assert!(array_at(&result, "").is_none());
        assert!(array_at(&result, "/missing").is_none());
    }
}
