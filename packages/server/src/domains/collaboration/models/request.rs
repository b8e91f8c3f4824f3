use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CampaignType, CollaborationStatus, ContentRequirements};
use crate::common::{AccountId, RequestId};
use crate::domains::collaboration::errors::CollaborationError;

const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 5000;
pub const MAX_MESSAGE_LEN: usize = 2000;
/// Largest amount a `NUMERIC(14, 2)` budget column holds.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);
const MAX_TAGS: usize = 20;
const MAX_TAG_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub min: Decimal,
    pub max: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_flexible: bool,
}

/// The negotiable part of a request: everything a brand sets at creation and
/// may revise while the request is still pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestTerms {
    pub title: String,
    pub description: String,
    pub initial_message: String,
    pub campaign_type: CampaignType,
    pub budget: Budget,
    pub timeline: Timeline,
    pub content_requirements: Option<ContentRequirements>,
    pub is_urgent: bool,
    pub tags: Vec<String>,
}

impl RequestTerms {
    /// Trim free text, upper-case the currency (falling back to
    /// `default_currency` when blank) and dedupe tags.
    pub fn normalized(mut self, default_currency: &str) -> Self {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.initial_message = self.initial_message.trim().to_string();

        let currency = self.budget.currency.trim();
        self.budget.currency = if currency.is_empty() {
            default_currency.to_ascii_uppercase()
        } else {
            currency.to_ascii_uppercase()
        };

        self.content_requirements = self.content_requirements.map(|c| c.normalized());

        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in self.tags {
            let tag = tag.trim().to_lowercase();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        self.tags = tags;
        self
    }

    /// Collects every problem with the terms into one validation error.
    pub fn validate(&self) -> Result<(), CollaborationError> {
        let mut problems = Vec::new();

        check_text(&mut problems, "title", &self.title, MAX_TITLE_LEN);
        check_text(&mut problems, "description", &self.description, MAX_DESCRIPTION_LEN);
        check_text(&mut problems, "initialMessage", &self.initial_message, MAX_MESSAGE_LEN);

        if self.budget.min < Decimal::ZERO {
            problems.push("budget.min must not be negative".to_string());
        }
        if self.budget.max < Decimal::ZERO {
            problems.push("budget.max must not be negative".to_string());
        }
        if self.budget.min > self.budget.max {
            problems.push("budget.min must not exceed budget.max".to_string());
        }
        if self.budget.max > MAX_AMOUNT || self.budget.min > MAX_AMOUNT {
            problems.push(format!("budget must not exceed {}", MAX_AMOUNT));
        }
        let currency = &self.budget.currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            problems.push(format!("budget.currency '{}' is not an ISO 4217 code", currency));
        }

        if self.timeline.start_date > self.timeline.end_date {
            problems.push("timeline.startDate must not be after timeline.endDate".to_string());
        }

        if self.tags.len() > MAX_TAGS {
            problems.push(format!("at most {} tags are allowed", MAX_TAGS));
        }
        if self.tags.iter().any(|t| t.chars().count() > MAX_TAG_LEN) {
            problems.push(format!("tags must be at most {} characters", MAX_TAG_LEN));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(CollaborationError::Validation(problems.join("; ")))
        }
    }
}

fn check_text(problems: &mut Vec<String>, field: &str, value: &str, max: usize) {
    if value.trim().is_empty() {
        problems.push(format!("{} is required", field));
    } else if value.chars().count() > max {
        problems.push(format!("{} must be at most {} characters", field, max));
    }
}

/// Partial edit of [`RequestTerms`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct TermsUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub initial_message: Option<String>,
    pub campaign_type: Option<CampaignType>,
    pub budget: Option<Budget>,
    pub timeline: Option<Timeline>,
    pub content_requirements: Option<ContentRequirements>,
    pub is_urgent: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl TermsUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.initial_message.is_none()
            && self.campaign_type.is_none()
            && self.budget.is_none()
            && self.timeline.is_none()
            && self.content_requirements.is_none()
            && self.is_urgent.is_none()
            && self.tags.is_none()
    }

    pub fn apply_to(self, current: &RequestTerms) -> RequestTerms {
        RequestTerms {
            title: self.title.unwrap_or_else(|| current.title.clone()),
            description: self.description.unwrap_or_else(|| current.description.clone()),
            initial_message: self
                .initial_message
                .unwrap_or_else(|| current.initial_message.clone()),
            campaign_type: self.campaign_type.unwrap_or(current.campaign_type),
            budget: self.budget.unwrap_or_else(|| current.budget.clone()),
            timeline: self.timeline.unwrap_or_else(|| current.timeline.clone()),
            content_requirements: self
                .content_requirements
                .or_else(|| current.content_requirements.clone()),
            is_urgent: self.is_urgent.unwrap_or(current.is_urgent),
            tags: self.tags.unwrap_or_else(|| current.tags.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterTimeline {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Terms a creator proposes instead of the brand's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterOffer {
    pub budget: Option<Decimal>,
    pub timeline: Option<CounterTimeline>,
}

impl CounterOffer {
    pub fn validate(&self) -> Result<(), CollaborationError> {
        if self.budget.is_none() && self.timeline.is_none() {
            return Err(CollaborationError::Validation(
                "counterOffer must propose a budget or a timeline".to_string(),
            ));
        }
        if matches!(self.budget, Some(b) if b < Decimal::ZERO) {
            return Err(CollaborationError::Validation(
                "counterOffer.budget must not be negative".to_string(),
            ));
        }
        if matches!(self.budget, Some(b) if b > MAX_AMOUNT) {
            return Err(CollaborationError::Validation(format!(
                "counterOffer.budget must not exceed {}",
                MAX_AMOUNT
            )));
        }
        if let Some(timeline) = &self.timeline {
            if timeline.start_date > timeline.end_date {
                return Err(CollaborationError::Validation(
                    "counterOffer.timeline.startDate must not be after endDate".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorResponse {
    pub message: String,
    pub counter_offer: Option<CounterOffer>,
    pub responded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandResponse {
    pub message: String,
    pub responded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Negotiation {
    pub creator_response: Option<CreatorResponse>,
    pub brand_response: Option<BrandResponse>,
}

/// A brand's proposal to a creator, and the aggregate root of the lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationRequest {
    pub id: RequestId,
    pub brand_id: AccountId,
    pub creator_id: AccountId,
    pub terms: RequestTerms,
    pub status: CollaborationStatus,
    pub negotiation: Negotiation,
    pub viewed_at: Option<DateTime<Utc>>,
    pub response_latency_secs: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CollaborationRequest {
    pub fn is_participant(&self, account_id: AccountId) -> bool {
        self.brand_id == account_id || self.creator_id == account_id
    }

    /// Whether the request has gone without activity for longer than `ttl`.
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        self.status == CollaborationStatus::Pending && self.updated_at + ttl < now
    }

    /// Seconds from creation until `now`, for the first creator action.
    pub fn latency_at(&self, now: DateTime<Utc>) -> Option<i64> {
        if self.response_latency_secs.is_some() {
            return None;
        }
        Some((now - self.created_at).num_seconds().max(0))
    }

    /// Apply a committed status change and patch in place.
    pub fn apply(&mut self, status: CollaborationStatus, patch: RequestPatch, now: DateTime<Utc>) {
        self.status = status;
        if let Some(terms) = patch.terms {
            self.terms = terms;
        }
        if let Some(response) = patch.creator_response {
            self.negotiation.creator_response = Some(response);
        }
        if let Some(response) = patch.brand_response {
            self.negotiation.brand_response = Some(response);
        }
        if self.response_latency_secs.is_none() {
            self.response_latency_secs = patch.response_latency_secs;
        }
        self.updated_at = now;
    }
}

/// Everything needed to insert a new pending request.
#[derive(Debug, Clone)]
pub struct NewCollaborationRequest {
    pub brand_id: AccountId,
    pub creator_id: AccountId,
    pub terms: RequestTerms,
}

/// Field writes that ride along with a CAS status update.
///
/// `response_latency_secs` is write-once: stores keep an existing value.
#[derive(Debug, Clone, Default)]
pub struct RequestPatch {
    pub terms: Option<RequestTerms>,
    pub creator_response: Option<CreatorResponse>,
    pub brand_response: Option<BrandResponse>,
    pub response_latency_secs: Option<i64>,
}
