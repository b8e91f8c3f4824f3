//! GraphQL shapes for analytics.

use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, GraphQLObject};
use uuid::Uuid;

use super::actions::ActorOverview;
use super::aggregator::{
    CampaignTypeBreakdown, EngagementSummary, MonthlyBucket, RevenueSummary, StatusDistribution,
    TrendingSubject,
};
use super::models::InteractionFlags;
use crate::common::{AccountId, ActorRole};
use crate::domains::collaboration::data::request::money_out;
use crate::domains::collaboration::models::{CampaignType, CollaborationStatus};
use crate::domains::collaboration::store::RequestScope;

fn count(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[derive(Debug, Clone, Default, GraphQLInputObject)]
pub struct AnalyticsScopeInput {
    pub brand_id: Option<Uuid>,
    pub creator_id: Option<Uuid>,
    /// Inclusive lower bound on creation time.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on creation time.
    pub to: Option<DateTime<Utc>>,
    pub campaign_type: Option<CampaignType>,
}

impl From<AnalyticsScopeInput> for RequestScope {
    fn from(input: AnalyticsScopeInput) -> Self {
        RequestScope {
            brand_id: input.brand_id.map(AccountId::from_uuid),
            creator_id: input.creator_id.map(AccountId::from_uuid),
            created_from: input.from,
            created_to: input.to,
            campaign_type: input.campaign_type,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct StatusCount {
    pub status: CollaborationStatus,
    pub count: i32,
}

pub fn status_counts(distribution: &StatusDistribution) -> Vec<StatusCount> {
    distribution
        .iter()
        .map(|(status, c)| StatusCount {
            status,
            count: count(c),
        })
        .collect()
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct CampaignTypeCount {
    pub campaign_type: CampaignType,
    pub count: i32,
}

pub fn campaign_type_counts(breakdown: &CampaignTypeBreakdown) -> Vec<CampaignTypeCount> {
    breakdown
        .iter()
        .map(|(campaign_type, c)| CampaignTypeCount {
            campaign_type,
            count: count(c),
        })
        .collect()
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct MonthlyTrendBucket {
    pub year: i32,
    pub month: i32,
    pub total: i32,
    pub completed: i32,
    pub revenue: f64,
}

impl From<MonthlyBucket> for MonthlyTrendBucket {
    fn from(bucket: MonthlyBucket) -> Self {
        Self {
            year: bucket.year,
            month: bucket.month as i32,
            total: count(bucket.total),
            completed: count(bucket.completed),
            revenue: money_out(bucket.revenue),
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "RevenueSummary")]
pub struct RevenueSummaryData {
    pub completed_count: i32,
    pub total_revenue: f64,
    pub avg_budget: f64,
    pub min_budget: f64,
    pub max_budget: f64,
}

impl From<RevenueSummary> for RevenueSummaryData {
    fn from(summary: RevenueSummary) -> Self {
        Self {
            completed_count: count(summary.completed_count),
            total_revenue: money_out(summary.total_revenue),
            avg_budget: money_out(summary.avg_budget),
            min_budget: money_out(summary.min_budget),
            max_budget: money_out(summary.max_budget),
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "EngagementSummary")]
pub struct EngagementSummaryData {
    pub total_views: i32,
    pub unique_viewers: i32,
    pub profile_clicks: i32,
    pub contact_clicks: i32,
    pub portfolio_views: i32,
    pub collaboration_requests: i32,
}

impl From<EngagementSummary> for EngagementSummaryData {
    fn from(summary: EngagementSummary) -> Self {
        Self {
            total_views: count(summary.total_views),
            unique_viewers: count(summary.unique_viewers),
            profile_clicks: count(summary.profile_clicks),
            contact_clicks: count(summary.contact_clicks),
            portfolio_views: count(summary.portfolio_views),
            collaboration_requests: count(summary.collaboration_requests),
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "TrendingSubject")]
pub struct TrendingSubjectData {
    pub subject_id: Uuid,
    pub subject_type: ActorRole,
    pub views: i32,
}

impl From<TrendingSubject> for TrendingSubjectData {
    fn from(subject: TrendingSubject) -> Self {
        Self {
            subject_id: subject.subject_id.into_uuid(),
            subject_type: subject.subject_type,
            views: count(subject.views),
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "ActorOverview")]
pub struct ActorOverviewData {
    pub account_id: Uuid,
    pub role: ActorRole,
    pub total_requests: i32,
    pub active_requests: i32,
    pub status_counts: Vec<StatusCount>,
    pub revenue: RevenueSummaryData,
    pub engagement: EngagementSummaryData,
}

impl From<ActorOverview> for ActorOverviewData {
    fn from(overview: ActorOverview) -> Self {
        Self {
            account_id: overview.account_id.into_uuid(),
            role: overview.role,
            total_requests: count(overview.requests.total()),
            active_requests: count(overview.requests.active()),
            status_counts: status_counts(&overview.requests),
            revenue: overview.revenue.into(),
            engagement: overview.engagement.into(),
        }
    }
}

#[derive(Debug, Clone, Default, GraphQLInputObject)]
pub struct ProfileViewInput {
    pub subject_id: Uuid,
    pub profile_clicked: Option<bool>,
    pub contact_clicked: Option<bool>,
    pub portfolio_viewed: Option<bool>,
    pub collaboration_requested: Option<bool>,
}

impl ProfileViewInput {
    pub fn interactions(&self) -> InteractionFlags {
        InteractionFlags {
            profile_clicked: self.profile_clicked.unwrap_or(false),
            contact_clicked: self.contact_clicked.unwrap_or(false),
            portfolio_viewed: self.portfolio_viewed.unwrap_or(false),
            collaboration_requested: self.collaboration_requested.unwrap_or(false),
        }
    }
}
