//! GraphQL surface: authentication, error extensions, pagination and an
//! end-to-end collaboration.

mod common;

use chrono::Duration;
use collab_core::domains::collaboration::models::CollaborationStatus;
use serde_json::json;
use test_context::test_context;

use crate::common::{seed_request, GraphQLClient, TestHarness};

const CREATE: &str = r#"
    mutation Create($creatorId: Uuid!) {
        createCollaborationRequest(input: {
            creatorId: $creatorId
            title: "Summer drop"
            description: "Two reels and a story"
            initialMessage: "Would love to work with you"
            campaignType: SPONSORED_CONTENT
            budget: { min: 500.0, max: 1000.0 }
            timeline: { startDate: "2030-06-01T00:00:00Z", endDate: "2030-07-01T00:00:00Z" }
            contentRequirements: { platforms: [INSTAGRAM], contentTypes: [REELS, STORIES] }
            tags: ["Summer", "summer", "fashion"]
        }) {
            id
            status
            budget { min max currency }
            tags
        }
    }
"#;

async fn create(client: &GraphQLClient, creator_id: &str) -> String {
    let data = client
        .query_with_vars(CREATE, vars! {"creatorId" => creator_id.to_string()})
        .await;
    data["createCollaborationRequest"]["id"]
        .as_str()
        .expect("id")
        .to_string()
}

async fn transition(client: &GraphQLClient, mutation: &str, id: &str) -> common::GraphQLResult {
    let query = format!(
        "mutation Transition($id: Uuid!) {{ {}(id: $id) {{ id status }} }}",
        mutation
    );
    client
        .execute_with_vars(&query, vars! {"id" => id.to_string()})
        .await
}

#[test_context(TestHarness)]
#[tokio::test]
async fn brand_creates_request(ctx: &TestHarness) {
    let brand = ctx.brand();
    let creator = ctx.creator();
    let client = ctx.graphql(&brand);

    let data = client
        .query_with_vars(CREATE, vars! {"creatorId" => creator.id.to_string()})
        .await;
    let created = &data["createCollaborationRequest"];

    assert_eq!(created["status"], "PENDING");
    assert_eq!(created["budget"]["currency"], "USD");
    assert_eq!(created["budget"]["max"], json!(1000.0));
    assert_eq!(created["tags"], json!(["summer", "fashion"]));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn anonymous_callers_are_forbidden(ctx: &TestHarness) {
    let creator = ctx.creator();
    let client = ctx.graphql_anonymous();

    let result = client
        .execute_with_vars(CREATE, vars! {"creatorId" => creator.id.to_string()})
        .await;
    assert_eq!(result.error_kind(), "FORBIDDEN");

    let result = client
        .execute("{ myCollaborationRequests { items { id } } }")
        .await;
    assert_eq!(result.error_kind(), "FORBIDDEN");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn duplicate_reports_existing_id(ctx: &TestHarness) {
    let brand = ctx.brand();
    let creator = ctx.creator();
    let client = ctx.graphql(&brand);
    let first_id = create(&client, &creator.id.to_string()).await;

    let result = client
        .execute_with_vars(CREATE, vars! {"creatorId" => creator.id.to_string()})
        .await;

    assert_eq!(result.error_kind(), "DUPLICATE_ACTIVE_REQUEST");
    assert_eq!(result.errors[0].extensions["existingId"], json!(first_id));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn illegal_transition_has_stable_kind(ctx: &TestHarness) {
    let brand = ctx.brand();
    let creator = ctx.creator();
    let id = create(&ctx.graphql(&brand), &creator.id.to_string()).await;
    let as_creator = ctx.graphql(&creator);

    let accepted = transition(&as_creator, "acceptCollaborationRequest", &id).await;
    assert!(accepted.is_ok());
    assert_eq!(accepted.get("acceptCollaborationRequest.status"), "ACCEPTED");

    let again = transition(&as_creator, "rejectCollaborationRequest", &id).await;
    assert_eq!(again.error_kind(), "INVALID_TRANSITION");
    assert_eq!(
        again.errors[0].message,
        "Cannot reject a request that is accepted"
    );

    let by_brand = transition(&ctx.graphql(&brand), "acceptCollaborationRequest", &id).await;
    assert_eq!(by_brand.error_kind(), "FORBIDDEN");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn validation_errors_are_reported(ctx: &TestHarness) {
    let brand = ctx.brand();
    let creator = ctx.creator();

    let query = r#"
        mutation Create($creatorId: Uuid!) {
            createCollaborationRequest(input: {
                creatorId: $creatorId
                title: "Backwards budget"
                description: "d"
                initialMessage: "m"
                campaignType: ONE_OFF
                budget: { min: 900.0, max: 100.0 }
                timeline: { startDate: "2030-06-01T00:00:00Z", endDate: "2030-07-01T00:00:00Z" }
            }) { id }
        }
    "#;
    let result = ctx
        .graphql(&brand)
        .execute_with_vars(query, vars! {"creatorId" => creator.id.to_string()})
        .await;
    assert_eq!(result.error_kind(), "VALIDATION_ERROR");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn pagination_defaults_and_bounds(ctx: &TestHarness) {
    let brand = ctx.brand();
    let client = ctx.graphql(&brand);
    for _ in 0..12 {
        create(&client, &ctx.creator().id.to_string()).await;
    }

    let data = client
        .query("{ myCollaborationRequests { items { id } pageInfo { page limit total pages } } }")
        .await;
    let page = &data["myCollaborationRequests"];
    assert_eq!(page["items"].as_array().map(Vec::len), Some(10));
    assert_eq!(
        page["pageInfo"],
        json!({"page": 1, "limit": 10, "total": 12, "pages": 2})
    );

    let data = client
        .query("{ myCollaborationRequests(page: 2, limit: 10) { items { id } } }")
        .await;
    assert_eq!(
        data["myCollaborationRequests"]["items"].as_array().map(Vec::len),
        Some(2)
    );

    for args in ["limit: 0", "limit: 101", "page: 0", "page: -3"] {
        let result = client
            .execute(&format!(
                "{{ myCollaborationRequests({}) {{ items {{ id }} }} }}",
                args
            ))
            .await;
        assert_eq!(result.error_kind(), "VALIDATION_ERROR", "args: {}", args);
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn status_filter_narrows_listing(ctx: &TestHarness) {
    let brand = ctx.brand();
    let creator = ctx.creator();
    let client = ctx.graphql(&brand);
    let id = create(&client, &creator.id.to_string()).await;
    create(&client, &ctx.creator().id.to_string()).await;
    transition(&ctx.graphql(&creator), "acceptCollaborationRequest", &id)
        .await
        .unwrap();

    let data = client
        .query("{ myCollaborationRequests(status: ACCEPTED) { items { id status } } }")
        .await;
    assert_eq!(
        data["myCollaborationRequests"]["items"],
        json!([{"id": id, "status": "ACCEPTED"}])
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn admin_only_operations(ctx: &TestHarness) {
    let brand = ctx.brand();
    let admin = ctx.admin();
    seed_request(
        ctx,
        &brand,
        &ctx.creator(),
        CollaborationStatus::Pending,
        Duration::days(40),
    )
    .await;

    let result = ctx
        .graphql(&brand)
        .execute("{ allCollaborationRequests { items { id } } }")
        .await;
    assert_eq!(result.error_kind(), "FORBIDDEN");

    let result = ctx
        .graphql(&brand)
        .execute("mutation { sweepExpiredRequests { expired } }")
        .await;
    assert_eq!(result.error_kind(), "FORBIDDEN");

    let admin_client = ctx.graphql(&admin);
    let data = admin_client
        .query("mutation { sweepExpiredRequests { scanned expired skipped failed } }")
        .await;
    assert_eq!(
        data["sweepExpiredRequests"],
        json!({"scanned": 1, "expired": 1, "skipped": 0, "failed": 0})
    );

    let data = admin_client
        .query("{ allCollaborationRequests(status: EXPIRED) { pageInfo { total } } }")
        .await;
    assert_eq!(data["allCollaborationRequests"]["pageInfo"]["total"], 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn admin_sets_status_along_legal_edges(ctx: &TestHarness) {
    let brand = ctx.brand();
    let admin = ctx.admin();
    let id = create(&ctx.graphql(&brand), &ctx.creator().id.to_string()).await;
    let client = ctx.graphql(&admin);

    let query = "mutation Set($id: Uuid!) { adminSetCollaborationStatus(id: $id, status: COMPLETED) { status } }";
    let result = client
        .execute_with_vars(query, vars! {"id" => id.clone()})
        .await;
    assert_eq!(result.error_kind(), "INVALID_TRANSITION");

    let query = "mutation Set($id: Uuid!) { adminSetCollaborationStatus(id: $id, status: ACCEPTED) { status } }";
    let data = client.query_with_vars(query, vars! {"id" => id}).await;
    assert_eq!(data["adminSetCollaborationStatus"]["status"], "ACCEPTED");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn negotiated_collaboration_end_to_end(ctx: &TestHarness) {
    let brand = ctx.brand();
    let creator = ctx.creator();
    let as_brand = ctx.graphql(&brand);
    let as_creator = ctx.graphql(&creator);
    let id = create(&as_brand, &creator.id.to_string()).await;

    let respond = r#"
        mutation Respond($id: Uuid!) {
            respondToCollaborationRequest(
                id: $id
                message: "Could we do 750?"
                counterOffer: { budget: 750.0 }
            ) {
                status
                negotiation { creatorResponse { message counterOffer { budget } } }
            }
        }
    "#;
    let data = as_creator
        .query_with_vars(respond, vars! {"id" => id.clone()})
        .await;
    let responded = &data["respondToCollaborationRequest"];
    assert_eq!(responded["status"], "PENDING");
    assert_eq!(
        responded["negotiation"]["creatorResponse"]["counterOffer"]["budget"],
        json!(750.0)
    );

    let reply = r#"
        mutation Reply($id: Uuid!) {
            replyToCollaborationRequest(id: $id, message: "Deal") {
                negotiation { brandResponse { message } }
            }
        }
    "#;
    let data = as_brand.query_with_vars(reply, vars! {"id" => id.clone()}).await;
    assert_eq!(
        data["replyToCollaborationRequest"]["negotiation"]["brandResponse"]["message"],
        "Deal"
    );

    transition(&as_creator, "acceptCollaborationRequest", &id)
        .await
        .unwrap();
    transition(&as_brand, "completeCollaborationRequest", &id)
        .await
        .unwrap();

    let data = as_brand
        .query("{ monthlyTrend(months: 12) { total completed revenue } revenueSummary { completedCount totalRevenue } }")
        .await;
    assert_eq!(
        data["monthlyTrend"],
        json!([{"total": 1, "completed": 1, "revenue": 1000.0}])
    );
    assert_eq!(data["revenueSummary"]["completedCount"], 1);
    assert_eq!(data["revenueSummary"]["totalRevenue"], json!(1000.0));

    let data = as_brand.query("{ statusDistribution { status count } }").await;
    let counts = data["statusDistribution"].as_array().expect("list");
    assert_eq!(counts.len(), 6);
    assert!(counts.contains(&json!({"status": "COMPLETED", "count": 1})));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn creator_first_view_sets_viewed_at(ctx: &TestHarness) {
    let brand = ctx.brand();
    let creator = ctx.creator();
    let id = create(&ctx.graphql(&brand), &creator.id.to_string()).await;
    let query = "query Get($id: Uuid!) { collaborationRequest(id: $id) { viewedAt } }";

    let data = ctx
        .graphql(&brand)
        .query_with_vars(query, vars! {"id" => id.clone()})
        .await;
    assert!(data["collaborationRequest"]["viewedAt"].is_null());

    let data = ctx
        .graphql(&creator)
        .query_with_vars(query, vars! {"id" => id.clone()})
        .await;
    assert!(data["collaborationRequest"]["viewedAt"].is_string());

    let stranger = ctx.brand();
    let result = ctx
        .graphql(&stranger)
        .execute_with_vars(query, vars! {"id" => id})
        .await;
    assert_eq!(result.error_kind(), "FORBIDDEN");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn profile_views_and_engagement(ctx: &TestHarness) {
    let creator = ctx.creator();
    let record = "mutation View($id: Uuid!) { recordProfileView(input: { subjectId: $id, contactClicked: true }) }";

    let data = ctx
        .graphql_anonymous()
        .query_with_vars(record, vars! {"id" => creator.id.to_string()})
        .await;
    assert_eq!(data["recordProfileView"], true);

    let data = ctx
        .graphql(&creator)
        .query_with_vars(record, vars! {"id" => creator.id.to_string()})
        .await;
    assert_eq!(data["recordProfileView"], false);

    let data = ctx
        .graphql(&creator)
        .query("{ engagementSummary { totalViews uniqueViewers contactClicks } }")
        .await;
    assert_eq!(
        data["engagementSummary"],
        json!({"totalViews": 1, "uniqueViewers": 0, "contactClicks": 1})
    );

    let data = ctx
        .graphql(&ctx.brand())
        .query("{ trendingSubjects(subjectType: CREATOR) { subjectId views } }")
        .await;
    assert_eq!(
        data["trendingSubjects"],
        json!([{"subjectId": creator.id.to_string(), "views": 1}])
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn oversized_budget_is_a_validation_error(ctx: &TestHarness) {
    let brand = ctx.brand();
    let creator = ctx.creator();

    let query = r#"
        mutation Create($creatorId: Uuid!) {
            createCollaborationRequest(input: {
                creatorId: $creatorId
                title: "Huge"
                description: "d"
                initialMessage: "m"
                campaignType: ONE_OFF
                budget: { min: 1.0, max: 10000000000000.0 }
                timeline: { startDate: "2030-06-01T00:00:00Z", endDate: "2030-07-01T00:00:00Z" }
            }) { id }
        }
    "#;
    let result = ctx
        .graphql(&brand)
        .execute_with_vars(query, vars! {"creatorId" => creator.id.to_string()})
        .await;

    assert_eq!(result.error_kind(), "VALIDATION_ERROR");
    assert!(result.errors[0].message.contains("budget must not exceed"));
}
