//! Campaign configuration owned by a single portal session.
//!
//! Every field here is user input. Prices are derived on read by
//! [`crate::cpq::pricing`]; nothing in this module stores a computed amount.
//! All mutation goes through [`CampaignConfig::apply`], which takes one
//! [`CampaignUpdate`] per user action.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cpq::catalog::{find_package, SocialPlatform, VideoAdPlatform};
use crate::cpq::discount::clamp_discount;
use crate::cpq::pricing::{
    bounded_budget, bounded_views, CULTURE_EDITS_MIN_VIEWS, STANDARD_CLIPPING_MIN_VIEWS,
};
use crate::domain::money::{deserialize_amount, deserialize_count};
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    VideoAds,
    PlaylistPlacement,
    RepostNetwork,
    SocialSeeding,
    PaidSocial,
    UgcStandardClipping,
    UgcCultureEdits,
    UgcTrendingPush,
    UgcCreatorFlood,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 9] = [
        Self::VideoAds,
        Self::PlaylistPlacement,
        Self::RepostNetwork,
        Self::SocialSeeding,
        Self::PaidSocial,
        Self::UgcStandardClipping,
        Self::UgcCultureEdits,
        Self::UgcTrendingPush,
        Self::UgcCreatorFlood,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::VideoAds => "YouTube Advertising",
            Self::PlaylistPlacement => "Spotify Playlisting",
            Self::RepostNetwork => "SoundCloud Reposts",
            Self::SocialSeeding => "Instagram Seeding",
            Self::PaidSocial => "Meta & TikTok Ads",
            Self::UgcStandardClipping => "Standard UGC Clipping",
            Self::UgcCultureEdits => "Culture Edits",
            Self::UgcTrendingPush => "Top 50 Trending / Popular Tab Push",
            Self::UgcCreatorFlood => "Creator Flood",
        }
    }

    pub fn is_ugc(self) -> bool {
        matches!(
            self,
            Self::UgcStandardClipping
                | Self::UgcCultureEdits
                | Self::UgcTrendingPush
                | Self::UgcCreatorFlood
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoAdSection {
    #[serde(default = "new_section_id")]
    pub id: String,
    #[serde(default)]
    pub platform: Option<VideoAdPlatform>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub target_views: u64,
}

impl VideoAdSection {
    pub fn empty() -> Self {
        Self { id: new_section_id(), platform: None, target_views: 0 }
    }
}

fn new_section_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoAdsConfig {
    pub enabled: bool,
    pub sections: Vec<VideoAdSection>,
    pub discount: Decimal,
}

impl Default for VideoAdsConfig {
    fn default() -> Self {
        Self { enabled: false, sections: vec![VideoAdSection::empty()], discount: Decimal::ZERO }
    }
}

impl VideoAdsConfig {
    fn section_mut(&mut self, section_id: &str) -> Result<&mut VideoAdSection, DomainError> {
        self.sections
            .iter_mut()
            .find(|section| section.id == section_id)
            .ok_or_else(|| DomainError::UnknownSection(section_id.to_string()))
    }
}

/// Shared shape of the playlist and repost services: one package from a
/// fixed table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageServiceConfig {
    pub enabled: bool,
    pub package: Option<String>,
    pub discount: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialSeedingConfig {
    pub enabled: bool,
    #[serde(deserialize_with = "deserialize_amount")]
    pub budget: Decimal,
    pub discount: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaidSocialConfig {
    pub enabled: bool,
    pub platform: Option<SocialPlatform>,
    #[serde(deserialize_with = "deserialize_amount")]
    pub budget: Decimal,
    pub discount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UgcViewServiceConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Missing or below-floor targets are raised to the floor by
    /// [`CampaignConfig::normalized`] and priced at the floor regardless.
    #[serde(default, deserialize_with = "deserialize_count")]
    pub target_views: u64,
    #[serde(default)]
    pub discount: Decimal,
}

impl UgcViewServiceConfig {
    fn with_floor(floor: u64) -> Self {
        Self { enabled: false, target_views: floor, discount: Decimal::ZERO }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UgcFlatServiceConfig {
    pub enabled: bool,
    pub discount: Decimal,
}

/// The UGC group toggle gates all four sub-services; each sub-service is
/// still enabled and discounted on its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UgcServicesConfig {
    pub enabled: bool,
    pub standard_clipping: UgcViewServiceConfig,
    pub culture_edits: UgcViewServiceConfig,
    pub trending_push: UgcFlatServiceConfig,
    pub creator_flood: UgcFlatServiceConfig,
}

impl Default for UgcServicesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            standard_clipping: UgcViewServiceConfig::with_floor(STANDARD_CLIPPING_MIN_VIEWS),
            culture_edits: UgcViewServiceConfig::with_floor(CULTURE_EDITS_MIN_VIEWS),
            trending_push: UgcFlatServiceConfig::default(),
            creator_flood: UgcFlatServiceConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    pub video_ads: VideoAdsConfig,
    pub playlist_placement: PackageServiceConfig,
    pub repost_network: PackageServiceConfig,
    pub social_seeding: SocialSeedingConfig,
    pub paid_social: PaidSocialConfig,
    pub ugc: UgcServicesConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum VideoAdsUpdate {
    SetEnabled { enabled: bool },
    SetDiscount { percent: Decimal },
    AddSection,
    RemoveSection { section_id: String },
    SetSectionPlatform { section_id: String, platform: Option<VideoAdPlatform> },
    SetSectionViews {
        section_id: String,
        #[serde(deserialize_with = "deserialize_count")]
        target_views: u64,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PackageUpdate {
    SetEnabled { enabled: bool },
    SetDiscount { percent: Decimal },
    SelectPackage { package: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SocialSeedingUpdate {
    SetEnabled { enabled: bool },
    SetDiscount { percent: Decimal },
    SetBudget {
        #[serde(deserialize_with = "deserialize_amount")]
        budget: Decimal,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PaidSocialUpdate {
    SetEnabled { enabled: bool },
    SetDiscount { percent: Decimal },
    SetPlatform { platform: Option<SocialPlatform> },
    SetBudget {
        #[serde(deserialize_with = "deserialize_amount")]
        budget: Decimal,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UgcViewUpdate {
    SetEnabled { enabled: bool },
    SetDiscount { percent: Decimal },
    SetTargetViews {
        #[serde(deserialize_with = "deserialize_count")]
        target_views: u64,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UgcFlatUpdate {
    SetEnabled { enabled: bool },
    SetDiscount { percent: Decimal },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", content = "change", rename_all = "snake_case")]
pub enum UgcUpdate {
    Group { enabled: bool },
    StandardClipping(UgcViewUpdate),
    CultureEdits(UgcViewUpdate),
    TrendingPush(UgcFlatUpdate),
    CreatorFlood(UgcFlatUpdate),
}

/// One user action against the campaign, addressed to a specific service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "service", content = "change", rename_all = "snake_case")]
pub enum CampaignUpdate {
    VideoAds(VideoAdsUpdate),
    PlaylistPlacement(PackageUpdate),
    RepostNetwork(PackageUpdate),
    SocialSeeding(SocialSeedingUpdate),
    PaidSocial(PaidSocialUpdate),
    Ugc(UgcUpdate),
}

impl CampaignConfig {
    /// Applies a single update. On error the configuration is left unchanged.
    pub fn apply(&mut self, update: CampaignUpdate) -> Result<(), DomainError> {
        match update {
            CampaignUpdate::VideoAds(change) => self.apply_video_ads(change),
            CampaignUpdate::PlaylistPlacement(change) => {
                apply_package(&mut self.playlist_placement, ServiceKind::PlaylistPlacement, change)
            }
            CampaignUpdate::RepostNetwork(change) => {
                apply_package(&mut self.repost_network, ServiceKind::RepostNetwork, change)
            }
            CampaignUpdate::SocialSeeding(change) => {
                let service = &mut self.social_seeding;
                match change {
                    SocialSeedingUpdate::SetEnabled { enabled } => service.enabled = enabled,
                    SocialSeedingUpdate::SetDiscount { percent } => {
                        service.discount = clamp_discount(ServiceKind::SocialSeeding, percent)
                    }
                    SocialSeedingUpdate::SetBudget { budget } => {
                        service.budget = bounded_budget(budget)
                    }
                }
                Ok(())
            }
            CampaignUpdate::PaidSocial(change) => {
                let service = &mut self.paid_social;
                match change {
                    PaidSocialUpdate::SetEnabled { enabled } => service.enabled = enabled,
                    PaidSocialUpdate::SetDiscount { percent } => {
                        service.discount = clamp_discount(ServiceKind::PaidSocial, percent)
                    }
                    PaidSocialUpdate::SetPlatform { platform } => service.platform = platform,
                    PaidSocialUpdate::SetBudget { budget } => service.budget = bounded_budget(budget),
                }
                Ok(())
            }
            CampaignUpdate::Ugc(change) => {
                self.apply_ugc(change);
                Ok(())
            }
        }
    }

    fn apply_video_ads(&mut self, change: VideoAdsUpdate) -> Result<(), DomainError> {
        let service = &mut self.video_ads;
        match change {
            VideoAdsUpdate::SetEnabled { enabled } => service.enabled = enabled,
            VideoAdsUpdate::SetDiscount { percent } => {
                service.discount = clamp_discount(ServiceKind::VideoAds, percent)
            }
            VideoAdsUpdate::AddSection => service.sections.push(VideoAdSection::empty()),
            VideoAdsUpdate::RemoveSection { section_id } => {
                let before = service.sections.len();
                service.sections.retain(|section| section.id != section_id);
                if service.sections.len() == before {
                    return Err(DomainError::UnknownSection(section_id));
                }
                if service.sections.is_empty() {
                    service.sections.push(VideoAdSection::empty());
                }
            }
            VideoAdsUpdate::SetSectionPlatform { section_id, platform } => {
                service.section_mut(&section_id)?.platform = platform;
            }
            VideoAdsUpdate::SetSectionViews { section_id, target_views } => {
                service.section_mut(&section_id)?.target_views = bounded_views(target_views);
            }
        }
        Ok(())
    }

    fn apply_ugc(&mut self, change: UgcUpdate) {
        let ugc = &mut self.ugc;
        match change {
            UgcUpdate::Group { enabled } => ugc.enabled = enabled,
            UgcUpdate::StandardClipping(change) => apply_ugc_views(
                &mut ugc.standard_clipping,
                ServiceKind::UgcStandardClipping,
                STANDARD_CLIPPING_MIN_VIEWS,
                change,
            ),
            UgcUpdate::CultureEdits(change) => apply_ugc_views(
                &mut ugc.culture_edits,
                ServiceKind::UgcCultureEdits,
                CULTURE_EDITS_MIN_VIEWS,
                change,
            ),
            UgcUpdate::TrendingPush(change) => {
                apply_ugc_flat(&mut ugc.trending_push, ServiceKind::UgcTrendingPush, change)
            }
            UgcUpdate::CreatorFlood(change) => {
                apply_ugc_flat(&mut ugc.creator_flood, ServiceKind::UgcCreatorFlood, change)
            }
        }
    }

    /// Whether the service counts toward totals. UGC sub-services also
    /// require the UGC group toggle.
    pub fn is_enabled(&self, service: ServiceKind) -> bool {
        match service {
            ServiceKind::VideoAds => self.video_ads.enabled,
            ServiceKind::PlaylistPlacement => self.playlist_placement.enabled,
            ServiceKind::RepostNetwork => self.repost_network.enabled,
            ServiceKind::SocialSeeding => self.social_seeding.enabled,
            ServiceKind::PaidSocial => self.paid_social.enabled,
            ServiceKind::UgcStandardClipping => {
                self.ugc.enabled && self.ugc.standard_clipping.enabled
            }
            ServiceKind::UgcCultureEdits => self.ugc.enabled && self.ugc.culture_edits.enabled,
            ServiceKind::UgcTrendingPush => self.ugc.enabled && self.ugc.trending_push.enabled,
            ServiceKind::UgcCreatorFlood => self.ugc.enabled && self.ugc.creator_flood.enabled,
        }
    }

    /// Stored discount percentage for the service, as entered.
    pub fn discount_percent(&self, service: ServiceKind) -> Decimal {
        match service {
            ServiceKind::VideoAds => self.video_ads.discount,
            ServiceKind::PlaylistPlacement => self.playlist_placement.discount,
            ServiceKind::RepostNetwork => self.repost_network.discount,
            ServiceKind::SocialSeeding => self.social_seeding.discount,
            ServiceKind::PaidSocial => self.paid_social.discount,
            ServiceKind::UgcStandardClipping => self.ugc.standard_clipping.discount,
            ServiceKind::UgcCultureEdits => self.ugc.culture_edits.discount,
            ServiceKind::UgcTrendingPush => self.ugc.trending_push.discount,
            ServiceKind::UgcCreatorFlood => self.ugc.creator_flood.discount,
        }
    }

    /// Re-applies entry-time invariants to a configuration that arrived from
    /// outside the update path (JSON or TOML payloads).
    pub fn normalized(mut self) -> Self {
        self.video_ads.discount = clamp_discount(ServiceKind::VideoAds, self.video_ads.discount);
        if self.video_ads.sections.is_empty() {
            self.video_ads.sections.push(VideoAdSection::empty());
        }
        for section in &mut self.video_ads.sections {
            section.target_views = bounded_views(section.target_views);
        }
        self.playlist_placement.discount =
            clamp_discount(ServiceKind::PlaylistPlacement, self.playlist_placement.discount);
        self.repost_network.discount =
            clamp_discount(ServiceKind::RepostNetwork, self.repost_network.discount);
        self.social_seeding.discount =
            clamp_discount(ServiceKind::SocialSeeding, self.social_seeding.discount);
        self.social_seeding.budget = bounded_budget(self.social_seeding.budget);
        self.paid_social.discount =
            clamp_discount(ServiceKind::PaidSocial, self.paid_social.discount);
        self.paid_social.budget = bounded_budget(self.paid_social.budget);

        let ugc = &mut self.ugc;
        ugc.standard_clipping.discount =
            clamp_discount(ServiceKind::UgcStandardClipping, ugc.standard_clipping.discount);
        ugc.standard_clipping.target_views =
            bounded_views(ugc.standard_clipping.target_views).max(STANDARD_CLIPPING_MIN_VIEWS);
        ugc.culture_edits.discount =
            clamp_discount(ServiceKind::UgcCultureEdits, ugc.culture_edits.discount);
        ugc.culture_edits.target_views =
            bounded_views(ugc.culture_edits.target_views).max(CULTURE_EDITS_MIN_VIEWS);
        ugc.trending_push.discount =
            clamp_discount(ServiceKind::UgcTrendingPush, ugc.trending_push.discount);
        ugc.creator_flood.discount =
            clamp_discount(ServiceKind::UgcCreatorFlood, ugc.creator_flood.discount);
        self
    }
}

fn apply_package(
    service: &mut PackageServiceConfig,
    kind: ServiceKind,
    change: PackageUpdate,
) -> Result<(), DomainError> {
    match change {
        PackageUpdate::SetEnabled { enabled } => service.enabled = enabled,
        PackageUpdate::SetDiscount { percent } => service.discount = clamp_discount(kind, percent),
        PackageUpdate::SelectPackage { package } => {
            if find_package(kind, &package).is_none() {
                return Err(DomainError::UnknownPackage { service: kind, package });
            }
            service.package = Some(package);
        }
    }
    Ok(())
}

fn apply_ugc_views(
    service: &mut UgcViewServiceConfig,
    kind: ServiceKind,
    floor: u64,
    change: UgcViewUpdate,
) {
    match change {
        UgcViewUpdate::SetEnabled { enabled } => service.enabled = enabled,
        UgcViewUpdate::SetDiscount { percent } => service.discount = clamp_discount(kind, percent),
        UgcViewUpdate::SetTargetViews { target_views } => {
            service.target_views = bounded_views(target_views).max(floor)
        }
    }
}

fn apply_ugc_flat(service: &mut UgcFlatServiceConfig, kind: ServiceKind, change: UgcFlatUpdate) {
    match change {
        UgcFlatUpdate::SetEnabled { enabled } => service.enabled = enabled,
        UgcFlatUpdate::SetDiscount { percent } => service.discount = clamp_discount(kind, percent),
    }
}
