//! Salesperson commission. Informational only; never affects what the client
//! pays.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cpq::discount::apply_discount;
use crate::cpq::pricing::{list_price, TRENDING_PUSH_PRICE};
use crate::domain::campaign::{CampaignConfig, ServiceKind};
use crate::domain::money::round_cents;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionCategory {
    /// 20% of the discounted price.
    Gross,
    /// 6% of the discounted price (20% of the 30% management fee).
    Net,
    /// 12.5% of the discounted price.
    UgcViews,
    /// 10% of the discounted flat-rate base.
    UgcFlat,
}

impl CommissionCategory {
    pub fn for_service(service: ServiceKind) -> Self {
        match service {
            ServiceKind::VideoAds | ServiceKind::PlaylistPlacement | ServiceKind::RepostNetwork => {
                Self::Gross
            }
            ServiceKind::SocialSeeding | ServiceKind::PaidSocial => Self::Net,
            ServiceKind::UgcStandardClipping | ServiceKind::UgcCultureEdits => Self::UgcViews,
            ServiceKind::UgcTrendingPush | ServiceKind::UgcCreatorFlood => Self::UgcFlat,
        }
    }

    pub fn rate(self) -> Decimal {
        match self {
            Self::Gross => Decimal::new(20, 2),
            Self::Net => Decimal::new(6, 2),
            Self::UgcViews => Decimal::new(125, 3),
            Self::UgcFlat => Decimal::new(10, 2),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionBreakdown {
    pub per_service: BTreeMap<ServiceKind, Decimal>,
    pub total: Decimal,
}

impl CommissionBreakdown {
    pub fn for_service(&self, service: ServiceKind) -> Decimal {
        self.per_service.get(&service).copied().unwrap_or(Decimal::ZERO)
    }
}

pub trait CommissionEngine: Send + Sync {
    fn commission(&self, campaign: &CampaignConfig) -> CommissionBreakdown;
}

#[derive(Default)]
pub struct DeterministicCommissionEngine;

impl CommissionEngine for DeterministicCommissionEngine {
    fn commission(&self, campaign: &CampaignConfig) -> CommissionBreakdown {
        compute_commission_breakdown(campaign)
    }
}

/// Price the commission rate is applied to. Both flat-rate UGC services
/// commission against the trending-push price rather than their own list
/// price.
pub fn commission_base(campaign: &CampaignConfig, service: ServiceKind) -> Decimal {
    match CommissionCategory::for_service(service) {
        CommissionCategory::UgcFlat => Decimal::from(TRENDING_PUSH_PRICE),
        _ => list_price(campaign, service),
    }
}

pub fn service_commission(campaign: &CampaignConfig, service: ServiceKind) -> Decimal {
    if !campaign.is_enabled(service) {
        return Decimal::ZERO;
    }
    let discounted = apply_discount(
        service,
        commission_base(campaign, service),
        campaign.discount_percent(service),
    );
    round_cents(discounted * CommissionCategory::for_service(service).rate())
}

/// Commission for every service kind, zero for disabled ones.
pub fn compute_commission_breakdown(campaign: &CampaignConfig) -> CommissionBreakdown {
    let per_service: BTreeMap<ServiceKind, Decimal> = ServiceKind::ALL
        .iter()
        .map(|service| (*service, service_commission(campaign, *service)))
        .collect();
    let total = per_service.values().copied().sum();

    CommissionBreakdown { per_service, total }
}
