//! GraphQL entity listings (promotions, categories, products)

use async_trait::async_trait;

use crate::runner::{Scenario, ScenarioContext, Verdict};

use super::{array_at, request_failure, sample};

/// Query an entity collection and expect `data.<entity>` to be an array
pub struct GraphqlListing {
    name: &'static str,
    entity: &'static str,
    query: &'static str,
    sample_size: usize,
}

impl GraphqlListing {
    fn pointer(&self) -> String {
        format!("/{}", self.entity)
    }
}

#[async_trait]
impl Scenario for GraphqlListing {
    fn name(&self) -> &str {
        self.name
    }

    fn requires_session(&self) -> bool {
        true
    }

    fn description(&self) -> &str {
        "GraphQL listing under the session token"
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Verdict {
        let result = ctx
            .client
            .authenticated_graphql(ctx.session, self.query, None)
            .await;

        if !result.success() {
            return Verdict::fail(request_failure(
                &format!("Could not fetch {}", self.entity),
                &result,
            ))
            .with_detail(result.to_json());
        }

        match array_at(&result, &self.pointer()) {
            Some(items) => Verdict::pass(format!("Fetched {} {}", items.len(), self.entity))
                .with_detail(sample(items, self.sample_size)),
            None => Verdict::fail(format!("data.{} is not an array", self.entity))
                .with_detail(result.to_json()),
        }
    }
}

pub fn promotions() -> GraphqlListing {
    GraphqlListing {
        name: "promotions-graphql",
        entity: "promotions",
        query: r#"
            query {
                promotions {
                    promotionId
                    promotionName
                    description
                    startDate
                    endDate
                    discountValue
                    status {
                        statusId
                        statusName
                    }
                    user {
                        userId
                        userName
                        email
                    }
                    category {
                        categoryId
                        categoryName
                        description
                    }
                }
            }
        "#,
        sample_size: 2,
    }
}

pub fn categories() -> GraphqlListing {
    GraphqlListing {
        name: "categories-graphql",
        entity: "categories",
        query: r#"
            query {
                categories {
                    categoryId
                    categoryName
                    description
                }
            }
        "#,
        sample_size: 3,
    }
}

pub fn products() -> GraphqlListing {
    GraphqlListing {
        name: "products-graphql",
        entity: "products",
        query: r#"
            query {
                products {
                    productId
                    productName
                    basePrice
                    sku
                    category {
                        categoryId
                        categoryName
                    }
                    promotion {
                        promotionId
                        promotionName
                        discountValue
                    }
                }
            }
        "#,
        sample_size: 2,
    }
}
