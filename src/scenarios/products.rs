//! Public product catalogue endpoints (REST)

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::http::{RequestOptions, RequestResult};
use crate::runner::{Scenario, ScenarioContext, Verdict};

use super::{array_at, request_failure, sample};

const UNKNOWN_CATEGORY: &str = "CategoriaInexistente";

pub struct ProductsStatus;

#[async_trait]
impl Scenario for ProductsStatus {
    fn name(&self) -> &str {
        "products-status"
    }

    fn requires_session(&self) -> bool {
        false
    }

    fn description(&self) -> &str {
        "GET /api/products/status answers 200"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Verdict {
        let url = ctx.client.url("/api/products/status");
        let result = ctx.client.request(&url, RequestOptions::get()).await;

        if result.status() == Some(200) {
            Verdict::pass("Product service is up").with_detail(result.to_json())
        } else {
            Verdict::fail(request_failure("Product service status check failed", &result))
                .with_detail(result.to_json())
        }
    }
}

/// `GET <path>` must answer `{success: true, products: [...]}`
pub struct ProductListing {
    name: &'static str,
    path: String,
    label: &'static str,
}

#[async_trait]
impl Scenario for ProductListing {
    fn name(&self) -> &str {
        self.name
    }

    fn requires_session(&self) -> bool {
        false
    }

    fn description(&self) -> &str {
        self.label
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Verdict {
        let url = ctx.client.url(&self.path);
        let result = ctx.client.request(&url, RequestOptions::get()).await;
        check_product_listing(&result)
    }
}

pub(crate) fn check_product_listing(result: &RequestResult) -> Verdict {
    let reported_success = result.pointer("/success").and_then(Value::as_bool) == Some(true);
    if result.status() != Some(200) || !reported_success {
        return Verdict::fail(request_failure("Could not fetch products", result))
            .with_detail(result.to_json());
    }

    match array_at(result, "/products") {
        Some(products) => Verdict::pass(format!("Fetched {} products", products.len()))
            .with_detail(sample(products, 1)),
        None => Verdict::fail("Response has no products array").with_detail(result.to_json()),
    }
}

pub fn all_products() -> ProductListing {
    ProductListing {
        name: "products-all",
        path: "/api/products".to_string(),
        label: "GET /api/products lists every product",
    }
}

pub fn by_category_id() -> ProductListing {
    ProductListing {
        name: "products-by-category-id",
        path: "/api/products/category/1".to_string(),
        label: "GET /api/products/category/1",
    }
}

pub fn by_category_name() -> ProductListing {
    ProductListing {
        name: "products-by-category-name",
        path: "/api/products/category/name/Electrodomésticos".to_string(),
        label: "GET /api/products/category/name/{name}",
    }
}

/// Querying a category that does not exist must report a failure,
/// never an empty success list
pub struct UnknownCategory;

#[async_trait]
impl Scenario for UnknownCategory {
    fn name(&self) -> &str {
        "products-unknown-category"
    }

    fn requires_session(&self) -> bool {
        false
    }

    fn description(&self) -> &str {
        "Unknown category name yields a failure indication"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Verdict {
        let url = ctx
            .client
            .url(&format!("/api/products/category/name/{}", UNKNOWN_CATEGORY));
        let result = ctx.client.request(&url, RequestOptions::get()).await;
        check_unknown_category(&result)
    }
}

pub(crate) fn check_unknown_category(result: &RequestResult) -> Verdict {
    let detail = json!({ "observedStatus": result.status(), "response": result.to_json() });

    let Some(status) = result.status() else {
        return Verdict::fail(request_failure("Request failed", result));
    };

    let reported_success = result.pointer("/success").and_then(Value::as_bool);
    let non_2xx = !(200..=299).contains(&status);

    if non_2xx || reported_success == Some(false) {
        Verdict::pass(format!("Unknown category rejected (HTTP {})", status)).with_detail(detail)
    } else {
        Verdict::fail(format!(
            "Unknown category answered HTTP {} without a failure indication",
            status
        ))
        .with_detail(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RequestError;

    fn completed(status: u16, data: Value) -> RequestResult {
        RequestResult::Completed { status, data }
    }

    #[test]
    fn test_listing_counts_products() {
        let verdict = check_product_listing(&completed(
            200,
            json!({"success": true, "products": [{"productId": 1}, {"productId": 2}]}),
        ));
        assert!(verdict.passed);
        assert_eq!(verdict.message, "Fetched 2 products");
        assert_eq!(verdict.detail, Some(json!([{"productId": 1}])));
    }

    #[test]
    fn test_listing_requires_success_flag() {
        let verdict = check_product_listing(&completed(200, json!({"success": false})));
        assert!(!verdict.passed);

        let verdict = check_product_listing(&completed(200, json!({"success": true})));
        assert!(!verdict.passed);
    }

    #[test]
    fn test_unknown_category_accepts_any_failure_indication() {
        assert!(check_unknown_category(&completed(500, json!({"success": false}))).passed);
        assert!(check_unknown_category(&completed(404, json!({"message": "not found"}))).passed);
        assert!(check_unknown_category(&completed(200, json!({"success": false}))).passed);
        assert!(
            check_unknown_category(&RequestResult::Failed {
                status: Some(404),
                error: RequestError::Decode("EOF".into()),
            })
            .passed
        );
    }

    #[test]
    fn test_unknown_category_rejects_empty_success() {
        let verdict =
            check_unknown_category(&completed(200, json!({"success": true, "products": []})));
        assert!(!verdict.passed);

        let verdict = check_unknown_category(&RequestResult::Failed {
            status: None,
            error: RequestError::Transport("connection refused".into()),
        });
        assert!(!verdict.passed);
    }
}
