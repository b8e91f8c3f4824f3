use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of collaboration a brand is proposing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    sqlx::Type,
    juniper::GraphQLEnum,
)]
#[sqlx(type_name = "campaign_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    SponsoredContent,
    ProductReview,
    BrandAmbassador,
    EventPromotion,
    LiveStream,
    ContentCreation,
    LongTermPartnership,
    OneOff,
}

impl CampaignType {
    pub const ALL: [CampaignType; 8] = [
        CampaignType::SponsoredContent,
        CampaignType::ProductReview,
        CampaignType::BrandAmbassador,
        CampaignType::EventPromotion,
        CampaignType::LiveStream,
        CampaignType::ContentCreation,
        CampaignType::LongTermPartnership,
        CampaignType::OneOff,
    ];
}

impl fmt::Display for CampaignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CampaignType::SponsoredContent => "sponsored_content",
            CampaignType::ProductReview => "product_review",
            CampaignType::BrandAmbassador => "brand_ambassador",
            CampaignType::EventPromotion => "event_promotion",
            CampaignType::LiveStream => "live_stream",
            CampaignType::ContentCreation => "content_creation",
            CampaignType::LongTermPartnership => "long_term_partnership",
            CampaignType::OneOff => "one_off",
        };
        write!(f, "{}", s)
    }
}

/// Social platform a deliverable is published on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, juniper::GraphQLEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Instagram,
    Youtube,
    Tiktok,
    Linkedin,
    Twitter,
    Facebook,
}

/// Format of a deliverable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, juniper::GraphQLEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Posts,
    Stories,
    Reels,
    Videos,
    LiveStreams,
    BlogPosts,
}

/// What the creator is expected to produce. Stored as JSONB.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentRequirements {
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub content_types: Vec<ContentType>,
    #[serde(default)]
    pub deliverables: Vec<String>,
    #[serde(default)]
    pub brand_guidelines: Option<String>,
}

impl ContentRequirements {
    /// Platforms and content types are sets; drop repeats while keeping the
    /// caller's ordering.
    pub fn normalized(mut self) -> Self {
        dedup_in_place(&mut self.platforms);
        dedup_in_place(&mut self.content_types);
        self.deliverables = self
            .deliverables
            .into_iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        self.brand_guidelines = self
            .brand_guidelines
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());
        self
    }
}

fn dedup_in_place<T: PartialEq + Copy>(items: &mut Vec<T>) {
    let mut seen: Vec<T> = Vec::with_capacity(items.len());
    items.retain(|item| {
        if seen.contains(item) {
            false
        } else {
            seen.push(*item);
            true
        }
    });
}
