use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::campaign::CampaignConfig;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProposalId(pub String);

impl ProposalId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Entry in the append-only log of proposals that were emailed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub id: ProposalId,
    pub artist_name: String,
    pub song_title: String,
    pub recipient_email: String,
    pub total_amount: Decimal,
    pub commission_total: Decimal,
    pub services_included: CampaignConfig,
    pub email_id: String,
    pub used_fallback: bool,
    pub created_at: DateTime<Utc>,
}
