pub mod aggregate;
pub mod catalog;
pub mod commission;
pub mod discount;
pub mod pricing;
pub mod validity;

use serde::{Deserialize, Serialize};

use crate::domain::{campaign::CampaignConfig, client::ClientDetails};

use self::{
    aggregate::{DeterministicPricingEngine, PricedBreakdown, PricingEngine},
    commission::{CommissionBreakdown, CommissionEngine, DeterministicCommissionEngine},
    validity::{DeterministicValidityGate, ValidityGate, ValidityResult},
};

#[derive(Clone, Copy, Debug)]
pub struct CampaignEvaluationInput<'a> {
    pub client: &'a ClientDetails,
    pub campaign: &'a CampaignConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignEvaluation {
    pub pricing: PricedBreakdown,
    pub commission: CommissionBreakdown,
    pub validity: ValidityResult,
}

pub trait CampaignRuntime: Send + Sync {
    fn evaluate(&self, input: CampaignEvaluationInput<'_>) -> CampaignEvaluation;
}

pub struct DeterministicCampaignRuntime<P, C, V> {
    pricing_engine: P,
    commission_engine: C,
    validity_gate: V,
}

impl<P, C, V> DeterministicCampaignRuntime<P, C, V> {
    pub fn new(pricing_engine: P, commission_engine: C, validity_gate: V) -> Self {
        Self { pricing_engine, commission_engine, validity_gate }
    }
}

impl Default
    for DeterministicCampaignRuntime<
        DeterministicPricingEngine,
        DeterministicCommissionEngine,
        DeterministicValidityGate,
    >
{
    fn default() -> Self {
        Self::new(
            DeterministicPricingEngine,
            DeterministicCommissionEngine,
            DeterministicValidityGate,
        )
    }
}

impl<P, C, V> CampaignRuntime for DeterministicCampaignRuntime<P, C, V>
where
    P: PricingEngine,
    C: CommissionEngine,
    V: ValidityGate,
{
    fn evaluate(&self, input: CampaignEvaluationInput<'_>) -> CampaignEvaluation {
        let pricing = self.pricing_engine.price(input.campaign);
        let commission = self.commission_engine.commission(input.campaign);
        let validity = self.validity_gate.check(input.client, input.campaign);

        CampaignEvaluation { pricing, commission, validity }
    }
}
