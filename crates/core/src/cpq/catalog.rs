use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::campaign::ServiceKind;

/// A fixed-price package offered for a package-based service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackageDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub details: &'static str,
    price_dollars: i64,
    contact_us: bool,
}

impl PackageDefinition {
    const fn priced(
        id: &'static str,
        label: &'static str,
        details: &'static str,
        price_dollars: i64,
    ) -> Self {
        Self { id, label, details, price_dollars, contact_us: false }
    }

    const fn contact_us(id: &'static str, label: &'static str, details: &'static str) -> Self {
        Self { id, label, details, price_dollars: 0, contact_us: true }
    }

    pub fn price(&self) -> Decimal {
        Decimal::from(self.price_dollars)
    }

    /// Largest tiers are quoted manually; their listed price of 0 means
    /// "not yet quoted", never "free".
    pub fn is_contact_us(&self) -> bool {
        self.contact_us
    }
}

pub const PLAYLIST_PACKAGES: &[PackageDefinition] = &[
    PackageDefinition::priced("10000", "10,000 Streams - $200", "10,000 streams package", 200),
    PackageDefinition::priced("20000", "20,000 Streams - $360", "20,000 streams package", 360),
    PackageDefinition::priced("30000", "30,000 Streams - $500", "30,000 streams package", 500),
    PackageDefinition::priced("40000", "40,000 Streams - $650", "40,000 streams package", 650),
    PackageDefinition::priced("50000", "50,000 Streams - $850", "50,000 streams package", 850),
    PackageDefinition::priced("60000", "60,000 Streams - $1,000", "60,000 streams package", 1_000),
    PackageDefinition::priced("70000", "70,000 Streams - $1,150", "70,000 streams package", 1_150),
    PackageDefinition::priced("80000", "80,000 Streams - $1,300", "80,000 streams package", 1_300),
    PackageDefinition::priced("90000", "90,000 Streams - $1,400", "90,000 streams package", 1_400),
    PackageDefinition::priced(
        "100000",
        "100,000 Streams - $1,500",
        "100,000 streams package",
        1_500,
    ),
    PackageDefinition::priced(
        "125000",
        "125,000 Streams - $1,800",
        "125,000 streams package",
        1_800,
    ),
    PackageDefinition::priced(
        "150000",
        "150,000 Streams - $2,100",
        "150,000 streams package",
        2_100,
    ),
    PackageDefinition::priced(
        "200000",
        "200,000 Streams - $2,700",
        "200,000 streams package",
        2_700,
    ),
    PackageDefinition::priced(
        "250000",
        "250,000 Streams - $3,600",
        "250,000 streams package",
        3_600,
    ),
    PackageDefinition::priced(
        "500000",
        "500,000 Streams - $7,000",
        "500,000 streams package",
        7_000,
    ),
    PackageDefinition::contact_us(
        "1000000",
        "1,000,000+ Streams - Contact Us",
        "1,000,000+ streams package",
    ),
];

pub const REPOST_PACKAGES: &[PackageDefinition] = &[
    PackageDefinition::priced("5m", "5M Reach • ~7K Plays - $150", "5M reach package", 150),
    PackageDefinition::priced("10m", "10M Reach • ~15K Plays - $300", "10M reach package", 300),
    PackageDefinition::priced("20m", "20M Reach • ~40K Plays - $600", "20M reach package", 600),
    PackageDefinition::priced("30m", "30M Reach • ~60K Plays - $850", "30M reach package", 850),
    PackageDefinition::priced("40m", "40M Reach • ~75K Plays - $1,175", "40M reach package", 1_175),
    PackageDefinition::priced(
        "60m",
        "60M Reach • ~100K Plays - $1,750",
        "60M reach package",
        1_750,
    ),
    PackageDefinition::priced(
        "80m",
        "80M Reach • ~125K Plays - $2,250",
        "80M reach package",
        2_250,
    ),
];

pub fn packages_for(service: ServiceKind) -> Option<&'static [PackageDefinition]> {
    match service {
        ServiceKind::PlaylistPlacement => Some(PLAYLIST_PACKAGES),
        ServiceKind::RepostNetwork => Some(REPOST_PACKAGES),
        _ => None,
    }
}

pub fn find_package(service: ServiceKind, package_id: &str) -> Option<&'static PackageDefinition> {
    packages_for(service)?.iter().find(|package| package.id == package_id)
}

/// One anchor of a piecewise-linear price curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurveAnchor {
    pub views: u64,
    pub price_dollars: i64,
}

/// Flat at the first anchor, linear between anchors, then a fixed
/// per-million rate beyond the last anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PiecewiseCurve {
    pub anchors: [CurveAnchor; 3],
    pub per_million_above: i64,
}

pub const SKIP_CURVE: PiecewiseCurve = PiecewiseCurve {
    anchors: [
        CurveAnchor { views: 10_000, price_dollars: 35 },
        CurveAnchor { views: 100_000, price_dollars: 350 },
        CurveAnchor { views: 1_000_000, price_dollars: 3_000 },
    ],
    per_million_above: 3_000,
};

pub const WEBSITE_CURVE: PiecewiseCurve = PiecewiseCurve {
    anchors: [
        CurveAnchor { views: 50_000, price_dollars: 150 },
        CurveAnchor { views: 100_000, price_dollars: 300 },
        CurveAnchor { views: 1_000_000, price_dollars: 2_500 },
    ],
    per_million_above: 2_500,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformPricing {
    Curve(&'static PiecewiseCurve),
    Cpm(Decimal),
}

/// Inventory tiers a video-ad section can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoAdPlatform {
    WwSkip,
    WwWebsite,
    UsaWebsite,
    LatamWebsite,
    EurAusWebsite,
    WwDisplay,
    LatamDisplay,
    EurAusCadDisplay,
    AsiaDisplay,
    AsiaWebsite,
}

impl VideoAdPlatform {
    pub const ALL: [VideoAdPlatform; 10] = [
        Self::WwSkip,
        Self::WwWebsite,
        Self::UsaWebsite,
        Self::LatamWebsite,
        Self::EurAusWebsite,
        Self::WwDisplay,
        Self::LatamDisplay,
        Self::EurAusCadDisplay,
        Self::AsiaDisplay,
        Self::AsiaWebsite,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::WwSkip => "WW Skip",
            Self::WwWebsite => "WW Website",
            Self::UsaWebsite => "USA Website - $13 CPM",
            Self::LatamWebsite => "LATAM Website - $5.60 CPM",
            Self::EurAusWebsite => "EUR/AUS Website - $12 CPM",
            Self::WwDisplay => "WW Display - $7 CPM",
            Self::LatamDisplay => "LATAM Display - $5.60 CPM",
            Self::EurAusCadDisplay => "EUR/AUS/CAD Display - $12 CPM",
            Self::AsiaDisplay => "ASIA Display - $6 CPM",
            Self::AsiaWebsite => "ASIA Website - $5 CPM",
        }
    }

    /// Label without the trailing CPM annotation.
    pub fn short_label(self) -> &'static str {
        let label = self.label();
        label.split(" - ").next().unwrap_or(label)
    }

    pub fn pricing(self) -> PlatformPricing {
        match self {
            Self::WwSkip => PlatformPricing::Curve(&SKIP_CURVE),
            Self::WwWebsite => PlatformPricing::Curve(&WEBSITE_CURVE),
            Self::UsaWebsite => PlatformPricing::Cpm(Decimal::from(13)),
            Self::LatamWebsite | Self::LatamDisplay => PlatformPricing::Cpm(Decimal::new(560, 2)),
            Self::EurAusWebsite | Self::EurAusCadDisplay => PlatformPricing::Cpm(Decimal::from(12)),
            Self::WwDisplay => PlatformPricing::Cpm(Decimal::from(7)),
            Self::AsiaDisplay => PlatformPricing::Cpm(Decimal::from(6)),
            Self::AsiaWebsite => PlatformPricing::Cpm(Decimal::from(5)),
        }
    }
}

/// Ad platforms for the paid-social service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialPlatform {
    Meta,
    Tiktok,
    Both,
}

impl SocialPlatform {
    pub fn label(self) -> &'static str {
        match self {
            Self::Meta => "Meta",
            Self::Tiktok => "TikTok",
            Self::Both => "Meta + TikTok",
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{
        find_package, PlatformPricing, VideoAdPlatform, PLAYLIST_PACKAGES, REPOST_PACKAGES,
    };
    use crate::domain::campaign::ServiceKind;

    #[test]
    fn package_tables_are_ordered_and_unique() {
        for table in [PLAYLIST_PACKAGES, REPOST_PACKAGES] {
            let mut ids: Vec<&str> = table.iter().map(|package| package.id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), table.len());
        }

        let priced: Vec<Decimal> = PLAYLIST_PACKAGES
            .iter()
            .filter(|package| !package.is_contact_us())
            .map(|package| package.price())
            .collect();
        assert!(priced.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn largest_playlist_tier_is_contact_us_sentinel() {
        let top = find_package(ServiceKind::PlaylistPlacement, "1000000").expect("top tier");
        assert!(top.is_contact_us());
        assert_eq!(top.price(), Decimal::ZERO);
    }

    #[test]
    fn packages_are_scoped_to_their_service() {
        assert!(find_package(ServiceKind::RepostNetwork, "20000").is_none());
        assert!(find_package(ServiceKind::SocialSeeding, "5m").is_none());
        assert_eq!(
            find_package(ServiceKind::RepostNetwork, "40m").map(|package| package.price()),
            Some(Decimal::from(1_175))
        );
    }

    #[test]
    fn every_cpm_platform_label_matches_its_rate() {
        for platform in VideoAdPlatform::ALL {
            if let PlatformPricing::Cpm(cpm) = platform.pricing() {
                let rendered = format!("${} CPM", cpm.normalize());
                let label = platform.label().replace("$5.60", "$5.6");
                assert!(label.ends_with(&rendered), "{} vs {}", platform.label(), rendered);
            }
        }
        assert_eq!(VideoAdPlatform::EurAusCadDisplay.short_label(), "EUR/AUS/CAD Display");
        assert_eq!(VideoAdPlatform::WwSkip.short_label(), "WW Skip");
    }
}
