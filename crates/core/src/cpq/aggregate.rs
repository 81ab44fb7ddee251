use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cpq::catalog::find_package;
use crate::cpq::discount::{clamp_discount, discount_amount};
use crate::cpq::pricing::{
    ad_spend, bounded_budget, bounded_views, effective_ugc_views, list_price, minimum_budget,
    seeding_view_estimate, section_price, CULTURE_EDITS_MIN_VIEWS, STANDARD_CLIPPING_MIN_VIEWS,
};
use crate::domain::campaign::{CampaignConfig, ServiceKind};
use crate::domain::money::{format_count, format_usd};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub service: ServiceKind,
    pub service_name: String,
    pub details: String,
    pub list_price: Decimal,
    pub discount_percent: Decimal,
    pub discount_amount: Decimal,
    pub discounted_price: Decimal,
    /// Expected reach, only for services that quote one (Instagram seeding).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_views: Option<ViewEstimate>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewEstimate {
    pub low: u64,
    pub high: u64,
}

/// Non-blocking warnings shown next to the summary. None of these stop a
/// service from being priced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PricingAdvisory {
    BudgetBelowMinimum { service: ServiceKind, budget: Decimal, minimum: Decimal },
    PlatformNotSelected { service: ServiceKind },
    ContactUsPackage { service: ServiceKind, package: String },
    SectionWithoutPlatform { section_id: String },
}

impl PricingAdvisory {
    pub fn message(&self) -> String {
        match self {
            Self::BudgetBelowMinimum { service, minimum, .. } => {
                format!("{}: minimum budget is {}", service.display_name(), format_usd(*minimum))
            }
            Self::PlatformNotSelected { service } => {
                format!("{}: select an ad platform", service.display_name())
            }
            Self::ContactUsPackage { service, .. } => {
                format!("{}: package requires a custom quote", service.display_name())
            }
            Self::SectionWithoutPlatform { .. } => {
                "YouTube Advertising: a campaign section has no platform".to_string()
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTraceStep {
    pub stage: String,
    pub detail: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTrace {
    pub currency: String,
    pub steps: Vec<PricingTraceStep>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedBreakdown {
    pub line_items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub total_discount: Decimal,
    pub grand_total: Decimal,
    pub advisories: Vec<PricingAdvisory>,
    pub trace: PricingTrace,
}

impl PricedBreakdown {
    pub fn has_active_service(&self) -> bool {
        !self.line_items.is_empty()
    }
}

pub trait PricingEngine: Send + Sync {
    fn price(&self, campaign: &CampaignConfig) -> PricedBreakdown;
}

#[derive(Default)]
pub struct DeterministicPricingEngine;

impl PricingEngine for DeterministicPricingEngine {
    fn price(&self, campaign: &CampaignConfig) -> PricedBreakdown {
        compute_priced_breakdown(campaign)
    }
}

pub fn compute_priced_breakdown(campaign: &CampaignConfig) -> PricedBreakdown {
    let mut line_items = Vec::new();
    let mut advisories = Vec::new();

    for service in ServiceKind::ALL {
        if !campaign.is_enabled(service) {
            continue;
        }
        advisories.extend(service_advisories(campaign, service));

        let price = list_price(campaign, service);
        if price <= Decimal::ZERO {
            continue;
        }
        let stored = campaign.discount_percent(service);
        let amount = discount_amount(service, price, stored);
        line_items.push(LineItem {
            service,
            service_name: service.display_name().to_string(),
            details: line_details(campaign, service),
            list_price: price,
            discount_percent: clamp_discount(service, stored),
            discount_amount: amount,
            discounted_price: price - amount,
            estimated_views: estimated_views(campaign, service),
        });
    }

    let subtotal: Decimal = line_items.iter().map(|item| item.list_price).sum();
    let total_discount: Decimal = line_items.iter().map(|item| item.discount_amount).sum();
    let grand_total = subtotal - total_discount;

    PricedBreakdown {
        line_items,
        subtotal,
        total_discount,
        grand_total,
        advisories,
        trace: PricingTrace {
            currency: "USD".to_string(),
            steps: vec![
                PricingTraceStep {
                    stage: "subtotal".to_string(),
                    detail: "sum(list_price) over enabled services".to_string(),
                    amount: subtotal,
                },
                PricingTraceStep {
                    stage: "discount".to_string(),
                    detail: "sum(list_price * clamped_discount / 100)".to_string(),
                    amount: total_discount,
                },
                PricingTraceStep {
                    stage: "grand_total".to_string(),
                    detail: "subtotal - discount".to_string(),
                    amount: grand_total,
                },
            ],
        },
    }
}

fn line_details(campaign: &CampaignConfig, service: ServiceKind) -> String {
    match service {
        ServiceKind::VideoAds => campaign
            .video_ads
            .sections
            .iter()
            .filter_map(|section| {
                let platform = section.platform?;
                (section_price(section) > Decimal::ZERO).then(|| {
                    format!(
                        "{} ({} views)",
                        platform.short_label(),
                        format_count(bounded_views(section.target_views))
                    )
                })
            })
            .collect::<Vec<_>>()
            .join(", "),
        ServiceKind::PlaylistPlacement | ServiceKind::RepostNetwork => {
            let config = if service == ServiceKind::PlaylistPlacement {
                &campaign.playlist_placement
            } else {
                &campaign.repost_network
            };
            config
                .package
                .as_deref()
                .and_then(|package| find_package(service, package))
                .map_or_else(String::new, |package| package.details.to_string())
        }
        ServiceKind::SocialSeeding => {
            format!("{} ad spend", format_usd(ad_spend(bounded_budget(campaign.social_seeding.budget))))
        }
        ServiceKind::PaidSocial => {
            let platform =
                campaign.paid_social.platform.map_or("Platform TBD", |platform| platform.label());
            let spend = ad_spend(bounded_budget(campaign.paid_social.budget));
            format!("{} - {} ad spend", platform, format_usd(spend))
        }
        ServiceKind::UgcStandardClipping => {
            let views =
                effective_ugc_views(&campaign.ugc.standard_clipping, STANDARD_CLIPPING_MIN_VIEWS);
            format!("{} views", format_count(views))
        }
        ServiceKind::UgcCultureEdits => {
            let views = effective_ugc_views(&campaign.ugc.culture_edits, CULTURE_EDITS_MIN_VIEWS);
            format!("{} views", format_count(views))
        }
        ServiceKind::UgcTrendingPush => "Guaranteed trending placement".to_string(),
        ServiceKind::UgcCreatorFlood => "10,000+ TikTok UGC posts".to_string(),
    }
}

fn estimated_views(campaign: &CampaignConfig, service: ServiceKind) -> Option<ViewEstimate> {
    if service != ServiceKind::SocialSeeding {
        return None;
    }
    seeding_view_estimate(bounded_budget(campaign.social_seeding.budget))
        .map(|(low, high)| ViewEstimate { low, high })
}

fn service_advisories(campaign: &CampaignConfig, service: ServiceKind) -> Vec<PricingAdvisory> {
    let mut advisories = Vec::new();

    if let Some(minimum) = minimum_budget(service) {
        let budget = list_price(campaign, service);
        if budget > Decimal::ZERO && budget < minimum {
            advisories.push(PricingAdvisory::BudgetBelowMinimum { service, budget, minimum });
        }
    }

    match service {
        ServiceKind::PaidSocial if campaign.paid_social.platform.is_none() => {
            advisories.push(PricingAdvisory::PlatformNotSelected { service });
        }
        ServiceKind::PlaylistPlacement | ServiceKind::RepostNetwork => {
            let config = if service == ServiceKind::PlaylistPlacement {
                &campaign.playlist_placement
            } else {
                &campaign.repost_network
            };
            if let Some(package) = config
                .package
                .as_deref()
                .and_then(|package| find_package(service, package))
                .filter(|package| package.is_contact_us())
            {
                advisories.push(PricingAdvisory::ContactUsPackage {
                    service,
                    package: package.id.to_string(),
                });
            }
        }
        ServiceKind::VideoAds => {
            advisories.extend(
                campaign
                    .video_ads
                    .sections
                    .iter()
                    .filter(|section| section.platform.is_none() && section.target_views > 0)
                    .map(|section| PricingAdvisory::SectionWithoutPlatform {
                        section_id: section.id.clone(),
                    }),
            );
        }
        _ => {}
    }

    advisories
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{compute_priced_breakdown, PricingAdvisory, ViewEstimate};
    use crate::cpq::catalog::{SocialPlatform, VideoAdPlatform};
    use crate::cpq::commission::{compute_commission_breakdown, CommissionCategory};
    use crate::cpq::pricing::MAX_BUDGET;
    use crate::domain::money::round_cents;
    use crate::domain::campaign::{
        CampaignConfig, CampaignUpdate, PackageUpdate, PaidSocialUpdate, ServiceKind,
        SocialSeedingUpdate, UgcUpdate, UgcViewUpdate, VideoAdsUpdate,
    };

    fn apply_all(campaign: &mut CampaignConfig, updates: Vec<CampaignUpdate>) {
        for update in updates {
            campaign.apply(update).expect("update should apply");
        }
    }

    fn video_campaign() -> CampaignConfig {
        let mut campaign = CampaignConfig::default();
        let first = campaign.video_ads.sections[0].id.clone();
        apply_all(
            &mut campaign,
            vec![
                CampaignUpdate::VideoAds(VideoAdsUpdate::SetEnabled { enabled: true }),
                CampaignUpdate::VideoAds(VideoAdsUpdate::SetSectionPlatform {
                    section_id: first.clone(),
                    platform: Some(VideoAdPlatform::WwSkip),
                }),
                CampaignUpdate::VideoAds(VideoAdsUpdate::SetSectionViews {
                    section_id: first,
                    target_views: 50_000,
                }),
                CampaignUpdate::VideoAds(VideoAdsUpdate::AddSection),
            ],
        );
        let second = campaign.video_ads.sections[1].id.clone();
        apply_all(
            &mut campaign,
            vec![
                CampaignUpdate::VideoAds(VideoAdsUpdate::SetSectionPlatform {
                    section_id: second.clone(),
                    platform: Some(VideoAdPlatform::UsaWebsite),
                }),
                CampaignUpdate::VideoAds(VideoAdsUpdate::SetSectionViews {
                    section_id: second,
                    target_views: 100_000,
                }),
            ],
        );
        campaign
    }

    #[test]
    fn video_ads_total_is_sum_of_sections() {
        let breakdown = compute_priced_breakdown(&video_campaign());

        assert_eq!(breakdown.line_items.len(), 1);
        let item = &breakdown.line_items[0];
        assert_eq!(item.list_price, Decimal::from(1_475));
        assert_eq!(item.details, "WW Skip (50,000 views), USA Website (100,000 views)");
        assert_eq!(breakdown.grand_total, Decimal::from(1_475));
    }

    #[test]
    fn disabling_video_ads_keeps_sections_but_drops_totals() {
        let mut campaign = video_campaign();
        let sections = campaign.video_ads.sections.clone();
        campaign
            .apply(CampaignUpdate::VideoAds(VideoAdsUpdate::SetEnabled { enabled: false }))
            .expect("disable");

        let breakdown = compute_priced_breakdown(&campaign);
        assert!(breakdown.line_items.is_empty());
        assert_eq!(breakdown.subtotal, Decimal::ZERO);
        assert_eq!(campaign.video_ads.sections, sections);
    }

    #[test]
    fn totals_combine_discounts_across_services() {
        let mut campaign = CampaignConfig::default();
        apply_all(
            &mut campaign,
            vec![
                CampaignUpdate::PlaylistPlacement(PackageUpdate::SetEnabled { enabled: true }),
                CampaignUpdate::PlaylistPlacement(PackageUpdate::SelectPackage {
                    package: "20000".to_string(),
                }),
                CampaignUpdate::PlaylistPlacement(PackageUpdate::SetDiscount {
                    percent: Decimal::from(10),
                }),
                CampaignUpdate::SocialSeeding(SocialSeedingUpdate::SetEnabled { enabled: true }),
                CampaignUpdate::SocialSeeding(SocialSeedingUpdate::SetBudget {
                    budget: Decimal::from(500),
                }),
                CampaignUpdate::Ugc(UgcUpdate::Group { enabled: true }),
                CampaignUpdate::Ugc(UgcUpdate::StandardClipping(UgcViewUpdate::SetEnabled {
                    enabled: true,
                })),
            ],
        );

        let breakdown = compute_priced_breakdown(&campaign);
        let services: Vec<ServiceKind> =
            breakdown.line_items.iter().map(|item| item.service).collect();
        assert_eq!(
            services,
            vec![
                ServiceKind::PlaylistPlacement,
                ServiceKind::SocialSeeding,
                ServiceKind::UgcStandardClipping
            ]
        );
        assert_eq!(breakdown.subtotal, Decimal::from(1_160));
        assert_eq!(breakdown.total_discount, Decimal::from(36));
        assert_eq!(breakdown.grand_total, Decimal::from(1_124));
        assert_eq!(breakdown.line_items[0].discounted_price, Decimal::from(324));
        assert_eq!(breakdown.line_items[0].details, "20,000 streams package");
        assert_eq!(breakdown.line_items[1].details, "$350 ad spend");
        assert_eq!(breakdown.line_items[2].details, "200,000 views");
        assert_eq!(breakdown.trace.steps.len(), 3);
    }

    #[test]
    fn seeding_line_item_carries_view_estimate() {
        let mut campaign = CampaignConfig::default();
        apply_all(
            &mut campaign,
            vec![
                CampaignUpdate::SocialSeeding(SocialSeedingUpdate::SetEnabled { enabled: true }),
                CampaignUpdate::SocialSeeding(SocialSeedingUpdate::SetBudget {
                    budget: Decimal::from(500),
                }),
                CampaignUpdate::PaidSocial(PaidSocialUpdate::SetEnabled { enabled: true }),
                CampaignUpdate::PaidSocial(PaidSocialUpdate::SetBudget {
                    budget: Decimal::from(1_000),
                }),
            ],
        );

        let breakdown = compute_priced_breakdown(&campaign);
        assert_eq!(
            breakdown.line_items[0].estimated_views,
            Some(ViewEstimate { low: 1_944, high: 11_666_666 })
        );
        assert_eq!(breakdown.line_items[1].estimated_views, None);

        let json = serde_json::to_value(&breakdown.line_items[1]).expect("serialize");
        assert!(json.get("estimated_views").is_none());
    }

    #[test]
    fn huge_budgets_price_at_the_cap_without_overflow() {
        let mut campaign = CampaignConfig::default();
        campaign.social_seeding.enabled = true;
        campaign.social_seeding.budget = Decimal::from_scientific("7e28").expect("7e28");
        campaign.social_seeding.discount = Decimal::from(5);
        campaign.paid_social.enabled = true;
        campaign.paid_social.budget = Decimal::MAX;
        campaign.paid_social.discount = Decimal::from(5);

        let breakdown = compute_priced_breakdown(&campaign);
        let cap = Decimal::from(MAX_BUDGET);
        assert_eq!(breakdown.subtotal, cap * Decimal::from(2));
        assert_eq!(breakdown.total_discount, Decimal::from(10_000_000));
        assert_eq!(breakdown.grand_total, Decimal::from(190_000_000));
        assert_eq!(breakdown.line_items[0].details, "$70,000,000 ad spend");

        let commission = compute_commission_breakdown(&campaign);
        let seeding_rate = CommissionCategory::for_service(ServiceKind::SocialSeeding).rate();
        assert_eq!(
            commission.per_service[&ServiceKind::SocialSeeding],
            round_cents(Decimal::from(95_000_000) * seeding_rate)
        );
        assert_eq!(commission.total, commission.per_service.values().copied().sum());
    }

    #[test]
    fn below_minimum_budget_is_priced_with_advisory() {
        let mut campaign = CampaignConfig::default();
        apply_all(
            &mut campaign,
            vec![
                CampaignUpdate::PaidSocial(PaidSocialUpdate::SetEnabled { enabled: true }),
                CampaignUpdate::PaidSocial(PaidSocialUpdate::SetBudget {
                    budget: Decimal::from(500),
                }),
            ],
        );

        let breakdown = compute_priced_breakdown(&campaign);
        assert_eq!(breakdown.grand_total, Decimal::from(500));
        assert_eq!(breakdown.line_items[0].details, "Platform TBD - $350 ad spend");
        assert!(breakdown.advisories.contains(&PricingAdvisory::BudgetBelowMinimum {
            service: ServiceKind::PaidSocial,
            budget: Decimal::from(500),
            minimum: Decimal::from(750),
        }));
        assert!(breakdown
            .advisories
            .contains(&PricingAdvisory::PlatformNotSelected { service: ServiceKind::PaidSocial }));

        campaign
            .apply(CampaignUpdate::PaidSocial(PaidSocialUpdate::SetPlatform {
                platform: Some(SocialPlatform::Both),
            }))
            .expect("platform");
        let breakdown = compute_priced_breakdown(&campaign);
        assert_eq!(breakdown.line_items[0].details, "Meta + TikTok - $350 ad spend");
    }

    #[test]
    fn contact_us_package_is_flagged_and_not_itemised() {
        let mut campaign = CampaignConfig::default();
        apply_all(
            &mut campaign,
            vec![
                CampaignUpdate::PlaylistPlacement(PackageUpdate::SetEnabled { enabled: true }),
                CampaignUpdate::PlaylistPlacement(PackageUpdate::SelectPackage {
                    package: "1000000".to_string(),
                }),
            ],
        );

        let breakdown = compute_priced_breakdown(&campaign);
        assert!(breakdown.line_items.is_empty());
        assert_eq!(
            breakdown.advisories,
            vec![PricingAdvisory::ContactUsPackage {
                service: ServiceKind::PlaylistPlacement,
                package: "1000000".to_string(),
            }]
        );
    }

    #[test]
    fn breakdown_is_pure() {
        let campaign = video_campaign();
        assert_eq!(compute_priced_breakdown(&campaign), compute_priced_breakdown(&campaign));
    }
}
