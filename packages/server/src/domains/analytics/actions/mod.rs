//! Engagement aggregator actions

pub mod engagement;
pub mod reports;

pub use engagement::{engagement_summary, record_view, trending_subjects};
pub use reports::{
    actor_overview, campaign_type_breakdown, monthly_trend, revenue_summary,
    status_distribution, ActorOverview,
};
