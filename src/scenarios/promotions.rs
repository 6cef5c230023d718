//! Promotion scenarios: REST listing and GraphQL creation

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::http::RequestOptions;
use crate::runner::{Scenario, ScenarioContext, Verdict};

use super::{array_at, request_failure, sample};

const CREATE_PROMOTION_MUTATION: &str = r#"
    mutation CreatePromotion($input: PromotionInput!) {
        createPromotion(promotionInput: $input) {
            promotionId
            promotionName
            description
            startDate
            endDate
            discountValue
            status {
                statusName
            }
            category {
                categoryName
            }
        }
    }
"#;

pub struct PromotionsRest;

#[async_trait]
impl Scenario for PromotionsRest {
    fn name(&self) -> &str {
        "promotions-rest"
    }

    fn requires_session(&self) -> bool {
        true
    }

    fn description(&self) -> &str {
        "GET /api/promotions returns an array"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Verdict {
        let url = ctx.client.url("/api/promotions");
        let result = ctx
            .client
            .authenticated_request(ctx.session, &url, RequestOptions::get())
            .await;

        if !result.success() {
            return Verdict::fail(request_failure("Could not fetch promotions", &result))
                .with_detail(result.to_json());
        }

        match array_at(&result, "") {
            Some(items) => Verdict::pass(format!("Fetched {} promotions", items.len()))
                .with_detail(sample(items, 2)),
            None => {
                Verdict::fail("Promotions response is not an array").with_detail(result.to_json())
            }
        }
    }
}

/// Input sent by the creation scenario
pub(crate) fn promotion_input() -> Value {
    json!({
        "promotionName": "Test Promotion API",
        "description": "Promoción creada desde test automatizado",
        "startDate": "2025-09-23",
        "endDate": "2025-12-31",
        "discountValue": 25.0,
        "statusId": 1,
        "categoryId": 1
    })
}

/// Fields of `input` that the created promotion does not echo back
pub(crate) fn echo_mismatches(input: &Value, created: &Value) -> Vec<String> {
    let mut mismatches = Vec::new();

    for field in ["promotionName", "description", "startDate", "endDate"] {
        if created.get(field) != input.get(field) {
            mismatches.push(format!(
                "{}: sent {}, got {}",
                field,
                input.get(field).unwrap_or(&Value::Null),
                created.get(field).unwrap_or(&Value::Null)
            ));
        }
    }

    let sent = input.get("discountValue").and_then(Value::as_f64);
    let got = created.get("discountValue").and_then(Value::as_f64);
    match (sent, got) {
        (Some(sent), Some(got)) if (sent - got).abs() < f64::EPSILON => {}
        _ => mismatches.push(format!("discountValue: sent {:?}, got {:?}", sent, got)),
    }

    mismatches
}

pub struct CreatePromotion;

#[async_trait]
impl Scenario for CreatePromotion {
    fn name(&self) -> &str {
        "create-promotion"
    }

    fn requires_session(&self) -> bool {
        true
    }

    fn description(&self) -> &str {
        "createPromotion mutation echoes the submitted fields"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Verdict {
        let input = promotion_input();
        let result = ctx
            .client
            .authenticated_graphql(
                ctx.session,
                CREATE_PROMOTION_MUTATION,
                Some(json!({ "input": input })),
            )
            .await;

        let created = match result.pointer("/createPromotion") {
            Some(created) if result.success() && created.is_object() => created,
            _ => {
                return Verdict::fail(request_failure("Could not create promotion", &result))
                    .with_detail(result.to_json())
            }
        };

        let mismatches = echo_mismatches(&input, created);
        if mismatches.is_empty() {
            Verdict::pass("Promotion created").with_detail(created.clone())
        } else {
            Verdict::fail(format!(
                "Created promotion does not match input: {}",
                mismatches.join("; ")
            ))
            .with_detail(created.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_echo_has_no_mismatches() {
        let input = promotion_input();
        let mut created = input.clone();
        created["promotionId"] = json!(42);
        created["discountValue"] = json!(25);
        assert!(echo_mismatches(&input, &created).is_empty());
    }

    #[test]
    fn test_changed_fields_are_reported() {
        let input = promotion_input();
        let mut created = input.clone();
        created["endDate"] = json!("2026-01-01");
        created["discountValue"] = json!(10.0);

        let mismatches = echo_mismatches(&input, &created);
        assert_eq!(mismatches.len(), 2);
        assert!(mismatches[0].starts_with("endDate"));
        assert!(mismatches[1].starts_with("discountValue"));
    }
}
