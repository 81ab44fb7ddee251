use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use amplify_core::config::ProposalConfig;
use amplify_core::cpq::aggregate::{compute_priced_breakdown, LineItem};
use amplify_core::cpq::commission::{compute_commission_breakdown, CommissionBreakdown};
use amplify_core::domain::campaign::{CampaignConfig, ServiceKind};
use amplify_core::domain::client::ClientDetails;
use amplify_core::domain::money::format_usd;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentSettings {
    pub company_name: String,
    pub legal_name: String,
    pub company_url: String,
    pub validity_days: u32,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            company_name: "Artist Influence".to_string(),
            legal_name: "Artist Influence, LLC".to_string(),
            company_url: "https://artistinfluence.com".to_string(),
            validity_days: 14,
        }
    }
}

impl From<&ProposalConfig> for DocumentSettings {
    fn from(config: &ProposalConfig) -> Self {
        Self {
            company_name: config.company_name.clone(),
            legal_name: config.legal_name.clone(),
            company_url: config.company_url.clone(),
            validity_days: config.validity_days,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceSummary {
    pub service: ServiceKind,
    pub details: String,
    pub list_price: Decimal,
    pub discount_percent: Decimal,
    pub price: Decimal,
    pub commission: Decimal,
}

impl ServiceSummary {
    fn from_line_item(item: &LineItem, commission: &CommissionBreakdown) -> Self {
        Self {
            service: item.service,
            details: item.details.clone(),
            list_price: item.list_price,
            discount_percent: item.discount_percent,
            price: item.discounted_price,
            commission: commission.for_service(item.service),
        }
    }
}

/// Everything a proposal email says about money, derived from the core
/// engines at build time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposalDocument {
    pub client: ClientDetails,
    pub services: Vec<ServiceSummary>,
    pub total_investment: Decimal,
    pub commission: CommissionBreakdown,
    pub valid_until: NaiveDate,
    pub settings: DocumentSettings,
}

impl ProposalDocument {
    pub fn build(
        client: &ClientDetails,
        campaign: &CampaignConfig,
        settings: &DocumentSettings,
        today: NaiveDate,
    ) -> Self {
        let pricing = compute_priced_breakdown(campaign);
        let commission = compute_commission_breakdown(campaign);
        let services = pricing
            .line_items
            .iter()
            .map(|item| ServiceSummary::from_line_item(item, &commission))
            .collect();
        let valid_until = today
            .checked_add_days(Days::new(u64::from(settings.validity_days)))
            .unwrap_or(NaiveDate::MAX);

        Self {
            client: client.clone(),
            services,
            total_investment: pricing.grand_total,
            commission,
            valid_until,
            settings: settings.clone(),
        }
    }

    pub fn subject(&self) -> String {
        format!("Campaign Proposal: {} - {}", self.client.artist_name, self.client.song_title)
    }

    pub fn total_investment_display(&self) -> String {
        format_usd(self.total_investment)
    }

    pub fn template_view(&self) -> DocumentView {
        DocumentView {
            company_name: self.settings.company_name.clone(),
            company_legal_name: self.settings.legal_name.clone(),
            company_url: self.settings.company_url.clone(),
            artist_name: self.client.artist_name.clone(),
            song_title: self.client.song_title.clone(),
            genre: self.client.genre.clone(),
            artist_tier: self
                .client
                .tier
                .map(|tier| tier.label().to_string())
                .unwrap_or_else(|| "Not specified".to_string()),
            release_date: self.client.release_date.format("%B %-d, %Y").to_string(),
            valid_until: self.valid_until.format("%-m/%-d/%Y").to_string(),
            services: self.services.iter().map(ServiceView::from).collect(),
            total_investment: self.total_investment_display(),
            commission_lines: self
                .services
                .iter()
                .map(|service| CommissionLineView {
                    name: service.service.display_name().to_string(),
                    amount: format_usd(service.commission),
                })
                .collect(),
            commission_total: format_usd(self.commission.total),
        }
    }
}

/// Flattened, pre-formatted view handed to the templates.
#[derive(Clone, Debug, Serialize)]
pub struct DocumentView {
    pub company_name: String,
    pub company_legal_name: String,
    pub company_url: String,
    pub artist_name: String,
    pub song_title: String,
    pub genre: String,
    pub artist_tier: String,
    pub release_date: String,
    pub valid_until: String,
    pub services: Vec<ServiceView>,
    pub total_investment: String,
    pub commission_lines: Vec<CommissionLineView>,
    pub commission_total: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ServiceView {
    pub name: String,
    pub details: String,
    pub price: String,
    pub goal: String,
    pub description: String,
}

impl From<&ServiceSummary> for ServiceView {
    fn from(summary: &ServiceSummary) -> Self {
        let price = if summary.discount_percent > Decimal::ZERO {
            format!(
                "{} ({}% off {})",
                format_usd(summary.price),
                summary.discount_percent.normalize(),
                format_usd(summary.list_price)
            )
        } else {
            format_usd(summary.price)
        };

        Self {
            name: summary.service.display_name().to_string(),
            details: summary.details.clone(),
            price,
            goal: service_goal(summary.service).to_string(),
            description: service_description(summary.service).to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CommissionLineView {
    pub name: String,
    pub amount: String,
}

pub fn service_goal(service: ServiceKind) -> &'static str {
    match service {
        ServiceKind::VideoAds => {
            "Turn the music video into a discovery asset with targeted, low-CPV YouTube views."
        }
        ServiceKind::PlaylistPlacement => {
            "Reach real listeners on genre-matched Spotify playlists and trigger algorithmic placements."
        }
        ServiceKind::RepostNetwork => {
            "Build credibility in the SoundCloud scene through reposts from verified artists and labels."
        }
        ServiceKind::SocialSeeding => {
            "Seed the sound on genre-aligned Instagram fan pages where the audience already spends time."
        }
        ServiceKind::PaidSocial => {
            "Drive qualified traffic to streaming platforms with paid Meta and TikTok placements."
        }
        ServiceKind::UgcStandardClipping => {
            "Multiply short-form reach with clipped highlights posted across creator pages."
        }
        ServiceKind::UgcCultureEdits => {
            "Place the record inside culture-driven edits that travel across short-form platforms."
        }
        ServiceKind::UgcTrendingPush => {
            "Secure guaranteed placement on trending and popular tabs during the release window."
        }
        ServiceKind::UgcCreatorFlood => {
            "Flood TikTok with 10,000+ creator posts using the sound to spark organic adoption."
        }
    }
}

pub fn service_description(service: ServiceKind) -> &'static str {
    match service {
        ServiceKind::VideoAds => {
            "Our YouTube ad campaigns turn music videos into highly optimized promotional assets using strategic international targeting and our proprietary view-to-engagement ratio engine. By tapping into global markets with ultra-low CPVs, we maximize reach while ensuring the video resonates with viewers. Whether the focus is subscribers, long-form engagement, or workarounds for unapproved videos, every campaign is tailored for high impact and transparent reporting."
        }
        ServiceKind::PlaylistPlacement => {
            "We run fully organic Spotify campaigns that place music on third-party playlists curated for the genre, reaching real listeners (not bots) and triggering Spotify's algorithm. Each campaign is designed for maximum discovery, often resulting in Discover Weekly or Radio placements, with strong performance in both U.S. and global markets. Stream goals are guaranteed, and every campaign includes weekly reporting, performance tracking, and strategic playlist placement to boost saves, followers, and engagement."
        }
        ServiceKind::RepostNetwork => {
            "We tap into an underground network of verified SoundCloud artists and labels to organically repost the track across genre-specific communities. With over 50 million active U.S.-based listeners reached through our repost groups, this service connects the music with passionate fans who actively seek new sounds. Campaigns are fully transparent, trackable, and optimized to foster genuine fan engagement rather than passive plays."
        }
        ServiceKind::SocialSeeding => {
            "Instagram seeding places the music on genre-aligned fan pages, like EDM edits or festival reels, where the target audience already hangs out. We handpick creators (not recycled influencers) for each campaign to ensure relevance and cost-efficiency, maximizing ROI and discovery. Every post tags the artist, links the sound, and is tracked via a live dashboard with real-time results."
        }
        ServiceKind::PaidSocial => {
            "Our Meta and TikTok ad service turns mix highlights and vertical edits into thumb-stopping paid placements across Facebook and Instagram feeds, Stories, Reels, and the TikTok For You feed. We build layered interest, behavior, and look-alike audiences, then continually A/B test creatives, hooks, and copy to lock in the lowest possible CPVs in high-value territories. Weekly reporting provides full delivery metrics plus audience insights."
        }
        ServiceKind::UgcStandardClipping => {
            "Standard UGC clipping distributes short-form clips of the record across a network of creator pages at $1.50 per 1,000 views over a 2-3 week campaign, with view counts tracked throughout."
        }
        ServiceKind::UgcCultureEdits => {
            "Culture edits pair the record with culture-driven short-form edits produced by our creator network at $1.50 per 1,000 views over a 2-3 week campaign."
        }
        ServiceKind::UgcTrendingPush => {
            "A flat-rate 2-3 week push that guarantees trending placement on Top 50 and popular tabs across platforms."
        }
        ServiceKind::UgcCreatorFlood => {
            "A flat-rate 3-4 week campaign delivering 10,000+ real TikTok UGC posts built around the sound."
        }
    }
}
