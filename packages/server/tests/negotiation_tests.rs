//! Negotiation: creator responses with counter-offers, brand replies and
//! terms revisions. None of these change status.

mod common;

use chrono::{Duration, Utc};
use collab_core::common::ActorRole;
use collab_core::domains::collaboration::actions::{
    accept_request, reject_request, reply_to_request, respond_to_request, update_terms,
};
use collab_core::domains::collaboration::events::CollaborationEvent;
use collab_core::domains::collaboration::models::{
    Budget, CollaborationStatus, CounterOffer, CounterTimeline, TermsUpdate,
};
use collab_core::domains::collaboration::CollaborationError;
use test_context::test_context;

use crate::common::{create_pending, money, seed_request, stored, TestHarness};

#[test_context(TestHarness)]
#[tokio::test]
async fn creator_counter_offer_is_recorded_without_status_change(ctx: &TestHarness) {
    let brand = ctx.brand();
    let creator = ctx.creator();
    let request = create_pending(ctx, &brand, &creator).await;

    let counter = CounterOffer {
        budget: Some(money(750)),
        timeline: None,
    };
    let updated = respond_to_request(
        request.id,
        &creator,
        "  Happy to, at a slightly different rate  ",
        Some(counter.clone()),
        ctx.deps(),
    )
    .await
    .unwrap();

    assert_eq!(updated.status, CollaborationStatus::Pending);
    let response = updated.negotiation.creator_response.expect("response stored");
    assert_eq!(response.message, "Happy to, at a slightly different rate");
    assert_eq!(response.counter_offer, Some(counter));
    assert!(updated.response_latency_secs.is_some());
    // The offer itself is unchanged until the brand revises it
    assert_eq!(updated.terms.budget.max, money(1000));

    let events = ctx.notifier.events();
    assert!(matches!(
        events.last(),
        Some(CollaborationEvent::ResponseReceived {
            from: ActorRole::Creator,
            ..
        })
    ));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn latency_comes_from_the_first_action(ctx: &TestHarness) {
    let brand = ctx.brand();
    let creator = ctx.creator();
    let request = seed_request(
        ctx,
        &brand,
        &creator,
        CollaborationStatus::Pending,
        Duration::hours(1),
    )
    .await;

    let responded = respond_to_request(request.id, &creator, "Interested", None, ctx.deps())
        .await
        .unwrap();
    let latency = responded.response_latency_secs.expect("latency recorded");

    let accepted = accept_request(request.id, &creator, ctx.deps()).await.unwrap();
    assert_eq!(accepted.response_latency_secs, Some(latency));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn only_pending_requests_take_creator_responses(ctx: &TestHarness) {
    let brand = ctx.brand();
    let creator = ctx.creator();
    let request = create_pending(ctx, &brand, &creator).await;
    accept_request(request.id, &creator, ctx.deps()).await.unwrap();

    let err = respond_to_request(request.id, &creator, "One more thing", None, ctx.deps())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "INVALID_TRANSITION");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn brand_cannot_respond_as_creator(ctx: &TestHarness) {
    let brand = ctx.brand();
    let creator = ctx.creator();
    let request = create_pending(ctx, &brand, &creator).await;

    let err = respond_to_request(request.id, &brand, "hello", None, ctx.deps())
        .await
        .unwrap_err();
    assert!(matches!(err, CollaborationError::Forbidden(_)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn invalid_counter_offers_and_messages_are_rejected(ctx: &TestHarness) {
    let brand = ctx.brand();
    let creator = ctx.creator();
    let request = create_pending(ctx, &brand, &creator).await;

    let err = respond_to_request(request.id, &creator, "   ", None, ctx.deps())
        .await
        .unwrap_err();
    assert!(matches!(err, CollaborationError::Validation(_)));

    let start = Utc::now() + Duration::days(10);
    let backwards = CounterOffer {
        budget: None,
        timeline: Some(CounterTimeline {
            start_date: start,
            end_date: start - Duration::days(1),
        }),
    };
    let err = respond_to_request(request.id, &creator, "new dates", Some(backwards), ctx.deps())
        .await
        .unwrap_err();
    assert!(matches!(err, CollaborationError::Validation(_)));

    let negative = CounterOffer {
        budget: Some(money(-5)),
        timeline: None,
    };
    let err = respond_to_request(request.id, &creator, "cheaper", Some(negative), ctx.deps())
        .await
        .unwrap_err();
    assert!(matches!(err, CollaborationError::Validation(_)));

    let current = stored(ctx, request.id).await;
    assert!(current.negotiation.creator_response.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn brand_replies_while_open(ctx: &TestHarness) {
    let brand = ctx.brand();
    let creator = ctx.creator();
    let request = create_pending(ctx, &brand, &creator).await;
    accept_request(request.id, &creator, ctx.deps()).await.unwrap();

    let replied = reply_to_request(request.id, &brand, "Great, briefing attached", ctx.deps())
        .await
        .unwrap();
    assert_eq!(replied.status, CollaborationStatus::Accepted);
    assert_eq!(
        replied.negotiation.brand_response.map(|r| r.message),
        Some("Great, briefing attached".to_string())
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn no_replies_on_closed_requests(ctx: &TestHarness) {
    let brand = ctx.brand();
    let creator = ctx.creator();
    let request = create_pending(ctx, &brand, &creator).await;
    reject_request(request.id, &creator, ctx.deps()).await.unwrap();

    let err = reply_to_request(request.id, &brand, "Sorry to hear", ctx.deps())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "INVALID_TRANSITION");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn brand_revises_pending_terms(ctx: &TestHarness) {
    let brand = ctx.brand();
    let creator = ctx.creator();
    let request = create_pending(ctx, &brand, &creator).await;

    let update = TermsUpdate {
        budget: Some(Budget {
            min: money(700),
            max: money(750),
            currency: "usd".to_string(),
        }),
        tags: Some(vec!["Fashion".to_string(), "spring".to_string(), "fashion".to_string()]),
        ..Default::default()
    };
    let revised = update_terms(request.id, &brand, update, ctx.deps()).await.unwrap();

    assert_eq!(revised.status, CollaborationStatus::Pending);
    assert_eq!(revised.terms.budget.max, money(750));
    assert_eq!(revised.terms.budget.currency, "USD");
    assert_eq!(revised.terms.tags, vec!["fashion", "spring"]);
    assert_eq!(revised.terms.title, request.terms.title);
    assert_eq!(ctx.notifier.event_names().last(), Some(&"terms_updated"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn terms_are_frozen_once_accepted(ctx: &TestHarness) {
    let brand = ctx.brand();
    let creator = ctx.creator();
    let request = create_pending(ctx, &brand, &creator).await;
    accept_request(request.id, &creator, ctx.deps()).await.unwrap();

    let update = TermsUpdate {
        title: Some("Different campaign".to_string()),
        ..Default::default()
    };
    let err = update_terms(request.id, &brand, update, ctx.deps()).await.unwrap_err();
    assert_eq!(err.kind(), "INVALID_TRANSITION");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn revised_terms_are_validated(ctx: &TestHarness) {
    let brand = ctx.brand();
    let creator = ctx.creator();
    let request = create_pending(ctx, &brand, &creator).await;

    let err = update_terms(request.id, &brand, TermsUpdate::default(), ctx.deps())
        .await
        .unwrap_err();
    assert!(matches!(err, CollaborationError::Validation(_)));

    let update = TermsUpdate {
        budget: Some(Budget {
            min: money(900),
            max: money(100),
            currency: "USD".to_string(),
        }),
        ..Default::default()
    };
    let err = update_terms(request.id, &brand, update, ctx.deps()).await.unwrap_err();
    assert!(matches!(err, CollaborationError::Validation(_)));

    let err = update_terms(
        request.id,
        &creator,
        TermsUpdate {
            is_urgent: Some(true),
            ..Default::default()
        },
        ctx.deps(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CollaborationError::Forbidden(_)));
}
