//! Analytics domain - the engagement aggregator.
//!
//! Derives read-only statistics from the request store and the profile view
//! log. Nothing in this domain mutates collaboration requests.

pub mod actions;
pub mod aggregator;
pub mod data;
pub mod models;
pub mod store;

pub use aggregator::{
    CampaignTypeBreakdown, EngagementSummary, MonthlyBucket, RevenueSummary, StatusDistribution,
    TrendingSubject,
};
pub use models::*;
pub use store::{InMemoryViewEventLog, PostgresViewEventLog, ViewEventLog};
