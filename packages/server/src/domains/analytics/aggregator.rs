//! Pure folds from loaded records to report values.
//!
//! Every fold is total: an empty input yields zero counts and zero money,
//! never an error or a NaN.

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

use super::models::ViewEvent;
use crate::common::{AccountId, ActorRole};
use crate::domains::collaboration::models::{
    CampaignType, CollaborationRequest, CollaborationStatus,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusDistribution {
    counts: BTreeMap<CollaborationStatus, i64>,
}

impl StatusDistribution {
    pub fn from_requests(requests: &[CollaborationRequest]) -> Self {
        let mut counts: BTreeMap<CollaborationStatus, i64> =
            CollaborationStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for request in requests {
            *counts.entry(request.status).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn count(&self, status: CollaborationStatus) -> i64 {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    pub fn total(&self) -> i64 {
        self.counts.values().sum()
    }

    pub fn active(&self) -> i64 {
        self.count(CollaborationStatus::Pending) + self.count(CollaborationStatus::Accepted)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CollaborationStatus, i64)> + '_ {
        self.counts.iter().map(|(s, c)| (*s, *c))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignTypeBreakdown {
    counts: BTreeMap<CampaignType, i64>,
}

impl CampaignTypeBreakdown {
    pub fn from_requests(requests: &[CollaborationRequest]) -> Self {
        let mut counts: BTreeMap<CampaignType, i64> =
            CampaignType::ALL.iter().map(|t| (*t, 0)).collect();
        for request in requests {
            *counts.entry(request.terms.campaign_type).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn count(&self, campaign_type: CampaignType) -> i64 {
        self.counts.get(&campaign_type).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CampaignType, i64)> + '_ {
        self.counts.iter().map(|(t, c)| (*t, *c))
    }
}

/// Requests created in one calendar month (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub total: i64,
    pub completed: i64,
    /// Σ budget.max over completed requests.
    pub revenue: Decimal,
}

/// Newest month first, at most `months` buckets. Months with no requests
/// are omitted.
pub fn monthly_trend(requests: &[CollaborationRequest], months: usize) -> Vec<MonthlyBucket> {
    if months == 0 {
        return Vec::new();
    }

    let mut buckets: BTreeMap<(i32, u32), MonthlyBucket> = BTreeMap::new();
    for request in requests {
        let key = (request.created_at.year(), request.created_at.month());
        let bucket = buckets.entry(key).or_insert_with(|| MonthlyBucket {
            year: key.0,
            month: key.1,
            total: 0,
            completed: 0,
            revenue: Decimal::ZERO,
        });
        bucket.total += 1;
        if request.status == CollaborationStatus::Completed {
            bucket.completed += 1;
            bucket.revenue += request.terms.budget.max;
        }
    }

    buckets.into_values().rev().take(months).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenueSummary {
    pub completed_count: i64,
    /// Σ budget.max
    pub total_revenue: Decimal,
    /// mean budget.max
    pub avg_budget: Decimal,
    /// smallest budget.min
    pub min_budget: Decimal,
    /// largest budget.max
    pub max_budget: Decimal,
}

impl RevenueSummary {
    pub fn zero() -> Self {
        Self {
            completed_count: 0,
            total_revenue: Decimal::ZERO,
            avg_budget: Decimal::ZERO,
            min_budget: Decimal::ZERO,
            max_budget: Decimal::ZERO,
        }
    }

    /// Only completed requests count as revenue.
    pub fn from_requests(requests: &[CollaborationRequest]) -> Self {
        let completed: Vec<&CollaborationRequest> = requests
            .iter()
            .filter(|r| r.status == CollaborationStatus::Completed)
            .collect();
        if completed.is_empty() {
            return Self::zero();
        }

        let count = completed.len() as i64;
        let total: Decimal = completed.iter().map(|r| r.terms.budget.max).sum();
        let min_budget = completed
            .iter()
            .map(|r| r.terms.budget.min)
            .min()
            .unwrap_or(Decimal::ZERO);
        let max_budget = completed
            .iter()
            .map(|r| r.terms.budget.max)
            .max()
            .unwrap_or(Decimal::ZERO);

        Self {
            completed_count: count,
            total_revenue: total,
            avg_budget: (total / Decimal::from(count)).round_dp(2),
            min_budget,
            max_budget,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngagementSummary {
    pub total_views: i64,
    /// Distinct signed-in viewers; anonymous views only count toward totals.
    pub unique_viewers: i64,
    pub profile_clicks: i64,
    pub contact_clicks: i64,
    pub portfolio_views: i64,
    pub collaboration_requests: i64,
}

impl EngagementSummary {
    pub fn from_events(events: &[ViewEvent]) -> Self {
        let mut summary = Self::default();
        let mut viewers: HashSet<AccountId> = HashSet::new();
        for event in events {
            summary.total_views += 1;
            if let Some(viewer) = event.viewer_id {
                viewers.insert(viewer);
            }
            let flags = event.interactions;
            summary.profile_clicks += flags.profile_clicked as i64;
            summary.contact_clicks += flags.contact_clicked as i64;
            summary.portfolio_views += flags.portfolio_viewed as i64;
            summary.collaboration_requests += flags.collaboration_requested as i64;
        }
        summary.unique_viewers = viewers.len() as i64;
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendingSubject {
    pub subject_id: AccountId,
    pub subject_type: ActorRole,
    pub views: i64,
}

/// Most-viewed subjects, ties broken by id for a stable order.
pub fn trending(events: &[ViewEvent], limit: usize) -> Vec<TrendingSubject> {
    let mut views: HashMap<AccountId, TrendingSubject> = HashMap::new();
    for event in events {
        views
            .entry(event.subject_id)
            .or_insert_with(|| TrendingSubject {
                subject_id: event.subject_id,
                subject_type: event.subject_type,
                views: 0,
            })
            .views += 1;
    }

    let mut ranked: Vec<TrendingSubject> = views.into_values().collect();
    ranked.sort_by(|a, b| {
        b.views
            .cmp(&a.views)
            .then_with(|| a.subject_id.cmp(&b.subject_id))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RequestId;
    use crate::domains::analytics::models::InteractionFlags;
    use crate::domains::collaboration::models::{
        Budget, Negotiation, RequestTerms, Timeline,
    };
    use crate::common::ViewEventId;
    use chrono::{TimeZone, Utc};

    fn request(
        status: CollaborationStatus,
        campaign_type: CampaignType,
        min: i64,
        max: i64,
        year: i32,
        month: u32,
    ) -> CollaborationRequest {
        let created_at = Utc.with_ymd_and_hms(year, month, 15, 12, 0, 0).unwrap();
        CollaborationRequest {
            id: RequestId::new(),
            brand_id: AccountId::new(),
            creator_id: AccountId::new(),
            terms: RequestTerms {
                title: "t".into(),
                description: "d".into(),
                initial_message: "m".into(),
                campaign_type,
                budget: Budget {
                    min: Decimal::from(min),
                    max: Decimal::from(max),
                    currency: "USD".into(),
                },
                timeline: Timeline {
                    start_date: created_at,
                    end_date: created_at,
                    is_flexible: false,
                },
                content_requirements: None,
                is_urgent: false,
                tags: vec![],
            },
            status,
            negotiation: Negotiation::default(),
            viewed_at: None,
            response_latency_secs: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn view(subject: AccountId, viewer: Option<AccountId>, flags: InteractionFlags) -> ViewEvent {
        ViewEvent {
            id: ViewEventId::new(),
            subject_id: subject,
            subject_type: ActorRole::Creator,
            viewer_id: viewer,
            viewer_type: viewer.map(|_| ActorRole::Brand),
            interactions: flags,
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_inputs_fold_to_zero() {
        let distribution = StatusDistribution::from_requests(&[]);
        assert_eq!(distribution.total(), 0);
        assert_eq!(distribution.iter().count(), CollaborationStatus::ALL.len());
        assert!(distribution.iter().all(|(_, c)| c == 0));

        assert_eq!(RevenueSummary::from_requests(&[]), RevenueSummary::zero());
        assert_eq!(EngagementSummary::from_events(&[]), EngagementSummary::default());
        assert!(monthly_trend(&[], 12).is_empty());
    }

    #[test]
    fn test_status_and_campaign_counts() {
        let requests = vec![
            request(CollaborationStatus::Pending, CampaignType::LiveStream, 1, 2, 2026, 1),
            request(CollaborationStatus::Pending, CampaignType::LiveStream, 1, 2, 2026, 1),
            request(CollaborationStatus::Completed, CampaignType::OneOff, 1, 2, 2026, 1),
        ];
        let distribution = StatusDistribution::from_requests(&requests);
        assert_eq!(distribution.count(CollaborationStatus::Pending), 2);
        assert_eq!(distribution.count(CollaborationStatus::Completed), 1);
        assert_eq!(distribution.count(CollaborationStatus::Rejected), 0);
        assert_eq!(distribution.active(), 2);

        let breakdown = CampaignTypeBreakdown::from_requests(&requests);
        assert_eq!(breakdown.count(CampaignType::LiveStream), 2);
        assert_eq!(breakdown.count(CampaignType::OneOff), 1);
        assert_eq!(breakdown.count(CampaignType::ProductReview), 0);
    }

    #[test]
    fn test_monthly_trend_newest_first_and_capped() {
        let requests = vec![
            request(CollaborationStatus::Completed, CampaignType::OneOff, 500, 1000, 2026, 3),
            request(CollaborationStatus::Pending, CampaignType::OneOff, 500, 1000, 2026, 3),
            request(CollaborationStatus::Completed, CampaignType::OneOff, 100, 200, 2026, 1),
            request(CollaborationStatus::Rejected, CampaignType::OneOff, 100, 200, 2025, 12),
        ];

        let trend = monthly_trend(&requests, 2);
        assert_eq!(trend.len(), 2);
        assert_eq!((trend[0].year, trend[0].month), (2026, 3));
        assert_eq!(trend[0].total, 2);
        assert_eq!(trend[0].completed, 1);
        assert_eq!(trend[0].revenue, Decimal::from(1000));
        assert_eq!((trend[1].year, trend[1].month), (2026, 1));

        assert!(monthly_trend(&requests, 0).is_empty());
    }

    #[test]
    fn test_revenue_only_counts_completed() {
        let requests = vec![
            request(CollaborationStatus::Completed, CampaignType::OneOff, 500, 1000, 2026, 3),
            request(CollaborationStatus::Completed, CampaignType::OneOff, 100, 300, 2026, 3),
            request(CollaborationStatus::Accepted, CampaignType::OneOff, 10, 99999, 2026, 3),
        ];
        let summary = RevenueSummary::from_requests(&requests);
        assert_eq!(summary.completed_count, 2);
        assert_eq!(summary.total_revenue, Decimal::from(1300));
        assert_eq!(summary.avg_budget, Decimal::from(650));
        assert_eq!(summary.min_budget, Decimal::from(100));
        assert_eq!(summary.max_budget, Decimal::from(1000));
    }

    #[test]
    fn test_engagement_counts_distinct_viewers_and_flags() {
        let subject = AccountId::new();
        let viewer = AccountId::new();
        let clicked = InteractionFlags {
            profile_clicked: true,
            contact_clicked: true,
            ..Default::default()
        };
        let events = vec![
            view(subject, Some(viewer), clicked),
            view(subject, Some(viewer), InteractionFlags::default()),
            view(subject, None, InteractionFlags { portfolio_viewed: true, ..Default::default() }),
        ];

        let summary = EngagementSummary::from_events(&events);
        assert_eq!(summary.total_views, 3);
        assert_eq!(summary.unique_viewers, 1);
        assert_eq!(summary.profile_clicks, 1);
        assert_eq!(summary.contact_clicks, 1);
        assert_eq!(summary.portfolio_views, 1);
        assert_eq!(summary.collaboration_requests, 0);
    }

    #[test]
    fn test_trending_ranks_by_views() {
        let popular = AccountId::new();
        let quiet = AccountId::new();
        let mut events = vec![view(quiet, None, InteractionFlags::default())];
        for _ in 0..3 {
            events.push(view(popular, None, InteractionFlags::default()));
        }

        let ranked = trending(&events, 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].subject_id, popular);
        assert_eq!(ranked[0].views, 3);

        assert_eq!(trending(&events, 1).len(), 1);
    }
}
