//! Test fixtures for creating test data.

use chrono::{DateTime, Duration, Utc};
use collab_core::common::{Actor, RequestId};
use collab_core::domains::collaboration::actions::create_request;
use collab_core::domains::collaboration::models::{
    Budget, CampaignType, CollaborationRequest, CollaborationStatus, ContentRequirements,
    ContentType, Negotiation, Platform, RequestTerms, Timeline,
};
use collab_core::domains::collaboration::RequestStore;
use rust_decimal::Decimal;

use super::TestHarness;

pub fn money(units: i64) -> Decimal {
    Decimal::from(units)
}

/// Valid terms with the given budget range in USD.
pub fn terms_with_budget(min: i64, max: i64) -> RequestTerms {
    let start = Utc::now() + Duration::days(7);
    RequestTerms {
        title: "Spring launch campaign".to_string(),
        description: "Three short videos featuring the new collection".to_string(),
        initial_message: "We love your content and would like to work together".to_string(),
        campaign_type: CampaignType::SponsoredContent,
        budget: Budget {
            min: money(min),
            max: money(max),
            currency: "USD".to_string(),
        },
        timeline: Timeline {
            start_date: start,
            end_date: start + Duration::days(30),
            is_flexible: false,
        },
        content_requirements: Some(ContentRequirements {
            platforms: vec![Platform::Instagram, Platform::Tiktok],
            content_types: vec![ContentType::Reels],
            deliverables: vec!["3 reels".to_string()],
            brand_guidelines: None,
        }),
        is_urgent: false,
        tags: vec!["fashion".to_string()],
    }
}

pub fn sample_terms() -> RequestTerms {
    terms_with_budget(500, 1000)
}

/// Create a pending request through the lifecycle engine.
pub async fn create_pending(
    ctx: &TestHarness,
    brand: &Actor,
    creator: &Actor,
) -> CollaborationRequest {
    create_request(brand, creator.id, sample_terms(), ctx.deps())
        .await
        .expect("Failed to create collaboration request")
}

/// Insert a request directly into the store, bypassing the engine, with
/// its last activity `age` in the past.
pub async fn seed_request(
    ctx: &TestHarness,
    brand: &Actor,
    creator: &Actor,
    status: CollaborationStatus,
    age: Duration,
) -> CollaborationRequest {
    let at: DateTime<Utc> = Utc::now() - age;
    let request = CollaborationRequest {
        id: RequestId::new(),
        brand_id: brand.id,
        creator_id: creator.id,
        terms: sample_terms(),
        status,
        negotiation: Negotiation::default(),
        viewed_at: None,
        response_latency_secs: None,
        created_at: at,
        updated_at: at,
    };
    ctx.requests.seed(request.clone()).await;
    request
}

/// Current stored state of a request.
pub async fn stored(ctx: &TestHarness, id: RequestId) -> CollaborationRequest {
    ctx.requests.get(id).await.expect("request exists")
}
