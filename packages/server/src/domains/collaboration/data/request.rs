//! GraphQL shapes for collaboration requests.
//!
//! Money crosses the API as `Float` (juniper has no decimal scalar) and is
//! rounded to cents on the way in.

use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, GraphQLObject};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::common::pagination::PageInfo;
use crate::common::Page;
use crate::domains::collaboration::errors::CollaborationError;
use crate::domains::collaboration::models::{
    BrandResponse, Budget, CampaignType, CollaborationRequest, CollaborationStatus,
    ContentRequirements, ContentType, CounterOffer, CounterTimeline, CreatorResponse, Platform,
    RequestTerms, TermsUpdate, Timeline,
};

pub(crate) fn money_out(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

pub(crate) fn money_in(value: f64, field: &str) -> Result<Decimal, CollaborationError> {
    Decimal::try_from(value)
        .map(|d| d.round_dp(2))
        .map_err(|_| CollaborationError::Validation(format!("{} is not a valid amount", field)))
}

// ============================================================================
// Output types
// ============================================================================

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "Budget")]
pub struct BudgetData {
    pub min: f64,
    pub max: f64,
    pub currency: String,
}

impl From<&Budget> for BudgetData {
    fn from(budget: &Budget) -> Self {
        Self {
            min: money_out(budget.min),
            max: money_out(budget.max),
            currency: budget.currency.clone(),
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "Timeline")]
pub struct TimelineData {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_flexible: bool,
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "ContentRequirements")]
pub struct ContentRequirementsData {
    pub platforms: Vec<Platform>,
    pub content_types: Vec<ContentType>,
    pub deliverables: Vec<String>,
    pub brand_guidelines: Option<String>,
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "CounterOffer")]
pub struct CounterOfferData {
    pub budget: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "CreatorResponse")]
pub struct CreatorResponseData {
    pub message: String,
    pub counter_offer: Option<CounterOfferData>,
    pub responded_at: DateTime<Utc>,
}

impl From<&CreatorResponse> for CreatorResponseData {
    fn from(response: &CreatorResponse) -> Self {
        Self {
            message: response.message.clone(),
            counter_offer: response.counter_offer.as_ref().map(|c| CounterOfferData {
                budget: c.budget.map(money_out),
                start_date: c.timeline.as_ref().map(|t| t.start_date),
                end_date: c.timeline.as_ref().map(|t| t.end_date),
            }),
            responded_at: response.responded_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "BrandResponse")]
pub struct BrandResponseData {
    pub message: String,
    pub responded_at: DateTime<Utc>,
}

impl From<&BrandResponse> for BrandResponseData {
    fn from(response: &BrandResponse) -> Self {
        Self {
            message: response.message.clone(),
            responded_at: response.responded_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "Negotiation")]
pub struct NegotiationData {
    pub creator_response: Option<CreatorResponseData>,
    pub brand_response: Option<BrandResponseData>,
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "CollaborationRequest")]
pub struct CollaborationRequestData {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    pub description: String,
    pub initial_message: String,
    pub campaign_type: CampaignType,
    pub budget: BudgetData,
    pub timeline: TimelineData,
    pub content_requirements: Option<ContentRequirementsData>,
    pub status: CollaborationStatus,
    pub negotiation: NegotiationData,
    pub is_urgent: bool,
    pub tags: Vec<String>,
    pub viewed_at: Option<DateTime<Utc>>,
    /// Seconds between creation and the creator's first action.
    pub response_latency_secs: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CollaborationRequest> for CollaborationRequestData {
    fn from(request: CollaborationRequest) -> Self {
        let terms = request.terms;
        Self {
            id: request.id.into_uuid(),
            brand_id: request.brand_id.into_uuid(),
            creator_id: request.creator_id.into_uuid(),
            budget: BudgetData::from(&terms.budget),
            timeline: TimelineData {
                start_date: terms.timeline.start_date,
                end_date: terms.timeline.end_date,
                is_flexible: terms.timeline.is_flexible,
            },
            content_requirements: terms.content_requirements.map(|c| ContentRequirementsData {
                platforms: c.platforms,
                content_types: c.content_types,
                deliverables: c.deliverables,
                brand_guidelines: c.brand_guidelines,
            }),
            title: terms.title,
            description: terms.description,
            initial_message: terms.initial_message,
            campaign_type: terms.campaign_type,
            status: request.status,
            negotiation: NegotiationData {
                creator_response: request
                    .negotiation
                    .creator_response
                    .as_ref()
                    .map(Into::into),
                brand_response: request.negotiation.brand_response.as_ref().map(Into::into),
            },
            is_urgent: terms.is_urgent,
            tags: terms.tags,
            viewed_at: request.viewed_at,
            response_latency_secs: request
                .response_latency_secs
                .map(|s| i32::try_from(s).unwrap_or(i32::MAX)),
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "CollaborationRequestPage")]
pub struct CollaborationRequestPage {
    pub items: Vec<CollaborationRequestData>,
    pub page_info: PageInfo,
}

impl From<Page<CollaborationRequest>> for CollaborationRequestPage {
    fn from(page: Page<CollaborationRequest>) -> Self {
        let page_info = PageInfo::from_page(&page);
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            page_info,
        }
    }
}

// ============================================================================
// Input types
// ============================================================================

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct BudgetInput {
    pub min: f64,
    pub max: f64,
    /// ISO 4217 code; the platform default when omitted.
    pub currency: Option<String>,
}

impl BudgetInput {
    fn into_budget(self) -> Result<Budget, CollaborationError> {
        Ok(Budget {
            min: money_in(self.min, "budget.min")?,
            max: money_in(self.max, "budget.max")?,
            currency: self.currency.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct TimelineInput {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_flexible: Option<bool>,
}

impl From<TimelineInput> for Timeline {
    fn from(input: TimelineInput) -> Self {
        Timeline {
            start_date: input.start_date,
            end_date: input.end_date,
            is_flexible: input.is_flexible.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct ContentRequirementsInput {
    pub platforms: Option<Vec<Platform>>,
    pub content_types: Option<Vec<ContentType>>,
    pub deliverables: Option<Vec<String>>,
    pub brand_guidelines: Option<String>,
}

impl From<ContentRequirementsInput> for ContentRequirements {
    fn from(input: ContentRequirementsInput) -> Self {
        ContentRequirements {
            platforms: input.platforms.unwrap_or_default(),
            content_types: input.content_types.unwrap_or_default(),
            deliverables: input.deliverables.unwrap_or_default(),
            brand_guidelines: input.brand_guidelines,
        }
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct CreateCollaborationRequestInput {
    pub creator_id: Uuid,
    pub title: String,
    pub description: String,
    pub initial_message: String,
    pub campaign_type: CampaignType,
    pub budget: BudgetInput,
    pub timeline: TimelineInput,
    pub content_requirements: Option<ContentRequirementsInput>,
    pub is_urgent: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl CreateCollaborationRequestInput {
    pub fn into_terms(self) -> Result<RequestTerms, CollaborationError> {
        Ok(RequestTerms {
            title: self.title,
            description: self.description,
            initial_message: self.initial_message,
            campaign_type: self.campaign_type,
            budget: self.budget.into_budget()?,
            timeline: self.timeline.into(),
            content_requirements: self.content_requirements.map(Into::into),
            is_urgent: self.is_urgent.unwrap_or(false),
            tags: self.tags.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct UpdateCollaborationTermsInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub initial_message: Option<String>,
    pub campaign_type: Option<CampaignType>,
    pub budget: Option<BudgetInput>,
    pub timeline: Option<TimelineInput>,
    pub content_requirements: Option<ContentRequirementsInput>,
    pub is_urgent: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl UpdateCollaborationTermsInput {
    pub fn into_update(self) -> Result<TermsUpdate, CollaborationError> {
        Ok(TermsUpdate {
            title: self.title,
            description: self.description,
            initial_message: self.initial_message,
            campaign_type: self.campaign_type,
            budget: self.budget.map(BudgetInput::into_budget).transpose()?,
            timeline: self.timeline.map(Into::into),
            content_requirements: self.content_requirements.map(Into::into),
            is_urgent: self.is_urgent,
            tags: self.tags,
        })
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct CounterOfferInput {
    pub budget: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl CounterOfferInput {
    pub fn into_counter_offer(self) -> Result<CounterOffer, CollaborationError> {
        let timeline = match (self.start_date, self.end_date) {
            (Some(start_date), Some(end_date)) => Some(CounterTimeline {
                start_date,
                end_date,
            }),
            (None, None) => None,
            _ => {
                return Err(CollaborationError::Validation(
                    "counterOffer needs both startDate and endDate".to_string(),
                ))
            }
        };
        Ok(CounterOffer {
            budget: self
                .budget
                .map(|b| money_in(b, "counterOffer.budget"))
                .transpose()?,
            timeline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_in_rounds_to_cents() {
        assert_eq!(money_in(19.999, "x").unwrap().to_string(), "20.00");
        assert_eq!(money_in(750.0, "x").unwrap(), Decimal::from(750));
        assert!(money_in(f64::NAN, "x").is_err());
    }

    #[test]
    fn test_counter_offer_requires_both_dates() {
        let input = CounterOfferInput {
            budget: None,
            start_date: Some(Utc::now()),
            end_date: None,
        };
        assert!(matches!(
            input.into_counter_offer(),
            Err(CollaborationError::Validation(_))
        ));
    }
}
