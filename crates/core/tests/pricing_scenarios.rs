use amplify_core::cpq::catalog::VideoAdPlatform;
use amplify_core::cpq::discount::discount_ceiling;
use amplify_core::domain::campaign::{
    PackageUpdate, SocialSeedingUpdate, UgcUpdate, UgcViewUpdate, VideoAdsUpdate,
};
use amplify_core::{
    compute_commission_breakdown, compute_priced_breakdown, is_submittable, ArtistTier,
    CampaignConfig, CampaignUpdate, ClientDetails, ServiceKind,
};
use rust_decimal::Decimal;

fn apply_all(campaign: &mut CampaignConfig, updates: Vec<CampaignUpdate>) {
    for update in updates {
        campaign.apply(update).expect("update should apply");
    }
}

fn complete_client() -> ClientDetails {
    ClientDetails {
        artist_name: "Luna Vale".to_owned(),
        song_title: "Afterglow".to_owned(),
        genre: "Indie".to_owned(),
        tier: Some(ArtistTier::MidTier),
        ..ClientDetails::default()
    }
}

#[test]
fn skip_section_at_fifty_thousand_views_costs_175() {
    let mut campaign = CampaignConfig::default();
    let section_id = campaign.video_ads.sections[0].id.clone();
    apply_all(
        &mut campaign,
        vec![
            CampaignUpdate::VideoAds(VideoAdsUpdate::SetEnabled { enabled: true }),
            CampaignUpdate::VideoAds(VideoAdsUpdate::SetSectionPlatform {
                section_id: section_id.clone(),
                platform: Some(VideoAdPlatform::WwSkip),
            }),
            CampaignUpdate::VideoAds(VideoAdsUpdate::SetSectionViews {
                section_id,
                target_views: 50_000,
            }),
        ],
    );

    let breakdown = compute_priced_breakdown(&campaign);
    assert_eq!(breakdown.grand_total, Decimal::from(175));
    assert_eq!(
        compute_commission_breakdown(&campaign).for_service(ServiceKind::VideoAds),
        Decimal::from(35)
    );
}

#[test]
fn discounted_playlist_package_and_gross_commission() {
    let mut campaign = CampaignConfig::default();
    apply_all(
        &mut campaign,
        vec![
            CampaignUpdate::PlaylistPlacement(PackageUpdate::SetEnabled { enabled: true }),
            CampaignUpdate::PlaylistPlacement(PackageUpdate::SelectPackage {
                package: "20000".to_owned(),
            }),
            CampaignUpdate::PlaylistPlacement(PackageUpdate::SetDiscount {
                percent: Decimal::from(10),
            }),
        ],
    );

    let breakdown = compute_priced_breakdown(&campaign);
    assert_eq!(breakdown.line_items[0].list_price, Decimal::from(360));
    assert_eq!(breakdown.line_items[0].discounted_price, Decimal::from(324));
    assert_eq!(compute_commission_breakdown(&campaign).total, Decimal::new(648, 1));
}

#[test]
fn seeding_budget_yields_ad_spend_and_net_commission() {
    let mut campaign = CampaignConfig::default();
    apply_all(
        &mut campaign,
        vec![
            CampaignUpdate::SocialSeeding(SocialSeedingUpdate::SetEnabled { enabled: true }),
            CampaignUpdate::SocialSeeding(SocialSeedingUpdate::SetBudget {
                budget: Decimal::from(500),
            }),
        ],
    );

    let breakdown = compute_priced_breakdown(&campaign);
    assert_eq!(breakdown.line_items[0].details, "$350 ad spend");
    assert_eq!(compute_commission_breakdown(&campaign).total, Decimal::from(30));
}

#[test]
fn empty_campaign_is_never_submittable() {
    assert!(!is_submittable(&complete_client(), &CampaignConfig::default()));
    assert!(!is_submittable(&ClientDetails::default(), &CampaignConfig::default()));
}

#[test]
fn standard_clipping_at_floor_costs_300() {
    let mut campaign = CampaignConfig::default();
    apply_all(
        &mut campaign,
        vec![
            CampaignUpdate::Ugc(UgcUpdate::Group { enabled: true }),
            CampaignUpdate::Ugc(UgcUpdate::StandardClipping(UgcViewUpdate::SetEnabled {
                enabled: true,
            })),
            CampaignUpdate::Ugc(UgcUpdate::StandardClipping(UgcViewUpdate::SetTargetViews {
                target_views: 200_000,
            })),
        ],
    );

    assert_eq!(compute_priced_breakdown(&campaign).grand_total, Decimal::from(300));
    assert!(is_submittable(&complete_client(), &campaign));
}

#[test]
fn discount_above_ceiling_matches_discount_at_ceiling() {
    let mut at_ceiling = CampaignConfig::default();
    let mut above = CampaignConfig::default();
    let base = vec![
        CampaignUpdate::RepostNetwork(PackageUpdate::SetEnabled { enabled: true }),
        CampaignUpdate::RepostNetwork(PackageUpdate::SelectPackage { package: "60m".to_owned() }),
    ];
    apply_all(&mut at_ceiling, base.clone());
    apply_all(&mut above, base);
    apply_all(
        &mut at_ceiling,
        vec![CampaignUpdate::RepostNetwork(PackageUpdate::SetDiscount {
            percent: discount_ceiling(ServiceKind::RepostNetwork),
        })],
    );
    apply_all(
        &mut above,
        vec![CampaignUpdate::RepostNetwork(PackageUpdate::SetDiscount {
            percent: Decimal::from(75),
        })],
    );

    assert_eq!(compute_priced_breakdown(&at_ceiling), compute_priced_breakdown(&above));
    assert_eq!(compute_commission_breakdown(&at_ceiling), compute_commission_breakdown(&above));
    assert_eq!(compute_priced_breakdown(&above).grand_total, Decimal::from(1_400));
}

#[test]
fn breakdowns_are_pure() {
    let mut campaign = CampaignConfig::default();
    apply_all(
        &mut campaign,
        vec![
            CampaignUpdate::SocialSeeding(SocialSeedingUpdate::SetEnabled { enabled: true }),
            CampaignUpdate::SocialSeeding(SocialSeedingUpdate::SetBudget {
                budget: Decimal::from(1_250),
            }),
        ],
    );

    assert_eq!(compute_priced_breakdown(&campaign), compute_priced_breakdown(&campaign));
    assert_eq!(compute_commission_breakdown(&campaign), compute_commission_breakdown(&campaign));
}
