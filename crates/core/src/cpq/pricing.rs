//! Per-service list-price functions.
//!
//! Every function here is pure and re-evaluated on each read; the campaign
//! model never stores a computed price.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::cpq::catalog::{find_package, PiecewiseCurve, PlatformPricing, VideoAdPlatform};
use crate::domain::campaign::{
    CampaignConfig, PackageServiceConfig, ServiceKind, UgcViewServiceConfig, VideoAdSection,
    VideoAdsConfig,
};
use crate::domain::money::{floor_dollars, round_cents, round_dollars};

pub const SOCIAL_SEEDING_MIN_BUDGET: i64 = 350;
pub const PAID_SOCIAL_MIN_BUDGET: i64 = 750;
pub const STANDARD_CLIPPING_MIN_VIEWS: u64 = 200_000;
pub const CULTURE_EDITS_MIN_VIEWS: u64 = 666_667;
pub const TRENDING_PUSH_PRICE: i64 = 7_500;
pub const CREATOR_FLOOD_PRICE: i64 = 10_000;
/// Largest budget a single budget-driven service accepts.
pub const MAX_BUDGET: i64 = 100_000_000;
/// Largest view target a single section or UGC service accepts.
pub const MAX_TARGET_VIEWS: u64 = 10_000_000_000;

const VIEWS_PER_MILLE: i64 = 1_000;
const VIEWS_PER_MILLION: i64 = 1_000_000;

/// Share of a social budget forwarded to the ad platforms (70%).
pub fn ad_spend_ratio() -> Decimal {
    Decimal::new(7, 1)
}

/// Flat CPM for the view-based UGC services ($1.50).
pub fn ugc_view_cpm() -> Decimal {
    Decimal::new(150, 2)
}

/// Budget clamped into `0..=MAX_BUDGET`. Keeps every derived amount far
/// from the `Decimal` range limit.
pub fn bounded_budget(budget: Decimal) -> Decimal {
    budget.max(Decimal::ZERO).min(Decimal::from(MAX_BUDGET))
}

pub fn bounded_views(views: u64) -> u64 {
    views.min(MAX_TARGET_VIEWS)
}

/// Evaluates a piecewise curve. Multiplication happens before division so
/// anchor-aligned inputs land on exact cents.
pub fn curve_price(curve: &PiecewiseCurve, views: u64) -> Decimal {
    let views = Decimal::from(views);
    let [first, middle, last] = curve.anchors;

    if views <= Decimal::from(first.views) {
        return Decimal::from(first.price_dollars);
    }

    for (low, high) in [(first, middle), (middle, last)] {
        if views <= Decimal::from(high.views) {
            let span_views = Decimal::from(high.views - low.views);
            let span_price = Decimal::from(high.price_dollars - low.price_dollars);
            let offset = views - Decimal::from(low.views);
            return round_cents(Decimal::from(low.price_dollars) + offset * span_price / span_views);
        }
    }

    let beyond = views - Decimal::from(last.views);
    round_cents(
        Decimal::from(last.price_dollars)
            + beyond * Decimal::from(curve.per_million_above) / Decimal::from(VIEWS_PER_MILLION),
    )
}

pub fn cpm_price(cpm: Decimal, views: u64) -> Decimal {
    round_cents(Decimal::from(views) * cpm / Decimal::from(VIEWS_PER_MILLE))
}

pub fn platform_price(platform: VideoAdPlatform, views: u64) -> Decimal {
    match platform.pricing() {
        PlatformPricing::Curve(curve) => curve_price(curve, views),
        PlatformPricing::Cpm(cpm) => cpm_price(cpm, views),
    }
}

/// A section without a platform is not yet configured and prices at 0.
pub fn section_price(section: &VideoAdSection) -> Decimal {
    section.platform.map_or(Decimal::ZERO, |platform| {
        platform_price(platform, bounded_views(section.target_views))
    })
}

pub fn video_ads_price(config: &VideoAdsConfig) -> Decimal {
    config.sections.iter().map(section_price).sum()
}

pub fn package_price(service: ServiceKind, config: &PackageServiceConfig) -> Decimal {
    config
        .package
        .as_deref()
        .and_then(|package| find_package(service, package))
        .map_or(Decimal::ZERO, |package| package.price())
}

/// Budget the client pays minus the 30% management fee, floored to dollars.
pub fn ad_spend(budget: Decimal) -> Decimal {
    floor_dollars(budget * ad_spend_ratio())
}

/// Expected seeding reach for a budget as `(low, high)` views, or `None`
/// when nothing would be spent.
pub fn seeding_view_estimate(budget: Decimal) -> Option<(u64, u64)> {
    let spend = ad_spend(budget);
    if spend <= Decimal::ZERO {
        return None;
    }
    let low = (spend / Decimal::new(18, 2)).floor();
    let high = (spend / Decimal::new(3, 5)).floor();
    Some((low.to_u64().unwrap_or(0), high.to_u64().unwrap_or(0)))
}

pub fn ugc_view_price(target_views: u64) -> Decimal {
    round_dollars(Decimal::from(target_views) * ugc_view_cpm() / Decimal::from(VIEWS_PER_MILLE))
}

fn ugc_view_service_price(config: &UgcViewServiceConfig, floor: u64) -> Decimal {
    ugc_view_price(effective_ugc_views(config, floor))
}

/// View target actually priced for a UGC view service.
pub fn effective_ugc_views(config: &UgcViewServiceConfig, floor: u64) -> u64 {
    bounded_views(config.target_views).max(floor)
}

/// Undiscounted price of a service from its current inputs, regardless of
/// whether the service is enabled.
pub fn list_price(campaign: &CampaignConfig, service: ServiceKind) -> Decimal {
    match service {
        ServiceKind::VideoAds => video_ads_price(&campaign.video_ads),
        ServiceKind::PlaylistPlacement => package_price(service, &campaign.playlist_placement),
        ServiceKind::RepostNetwork => package_price(service, &campaign.repost_network),
        ServiceKind::SocialSeeding => bounded_budget(campaign.social_seeding.budget),
        ServiceKind::PaidSocial => bounded_budget(campaign.paid_social.budget),
        ServiceKind::UgcStandardClipping => {
            ugc_view_service_price(&campaign.ugc.standard_clipping, STANDARD_CLIPPING_MIN_VIEWS)
        }
        ServiceKind::UgcCultureEdits => {
            ugc_view_service_price(&campaign.ugc.culture_edits, CULTURE_EDITS_MIN_VIEWS)
        }
        ServiceKind::UgcTrendingPush => Decimal::from(TRENDING_PUSH_PRICE),
        ServiceKind::UgcCreatorFlood => Decimal::from(CREATOR_FLOOD_PRICE),
    }
}

/// Minimum budget for the budget-driven services.
pub fn minimum_budget(service: ServiceKind) -> Option<Decimal> {
    match service {
        ServiceKind::SocialSeeding => Some(Decimal::from(SOCIAL_SEEDING_MIN_BUDGET)),
        ServiceKind::PaidSocial => Some(Decimal::from(PAID_SOCIAL_MIN_BUDGET)),
        _ => None,
    }
}
