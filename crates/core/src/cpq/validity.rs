use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cpq::pricing::list_price;
use crate::domain::campaign::{CampaignConfig, ServiceKind};
use crate::domain::client::{ClientDetails, GENRES};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityViolation {
    pub code: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityResult {
    pub submittable: bool,
    pub violations: Vec<ValidityViolation>,
}

pub trait ValidityGate: Send + Sync {
    fn check(&self, client: &ClientDetails, campaign: &CampaignConfig) -> ValidityResult;
}

#[derive(Default)]
pub struct DeterministicValidityGate;

impl ValidityGate for DeterministicValidityGate {
    fn check(&self, client: &ClientDetails, campaign: &CampaignConfig) -> ValidityResult {
        evaluate_validity(client, campaign)
    }
}

/// A service counts as active once it is enabled and priced above zero,
/// even when its budget is under the advertised minimum.
pub fn has_active_service(campaign: &CampaignConfig) -> bool {
    ServiceKind::ALL
        .iter()
        .any(|service| campaign.is_enabled(*service) && list_price(campaign, *service) > Decimal::ZERO)
}

pub fn is_submittable(client: &ClientDetails, campaign: &CampaignConfig) -> bool {
    client.is_complete() && !client.has_unlisted_genre() && has_active_service(campaign)
}

pub fn evaluate_validity(client: &ClientDetails, campaign: &CampaignConfig) -> ValidityResult {
    let mut violations: Vec<ValidityViolation> = client
        .missing_required_fields()
        .into_iter()
        .map(|field| ValidityViolation {
            code: format!("MISSING_{}", field.to_ascii_uppercase()),
            message: format!("Client field `{field}` is required"),
        })
        .collect();

    if client.has_unlisted_genre() {
        violations.push(ValidityViolation {
            code: "UNKNOWN_GENRE".to_string(),
            message: format!("Genre `{}` is not one of: {}", client.genre.trim(), GENRES.join(", ")),
        });
    }

    if !has_active_service(campaign) {
        violations.push(ValidityViolation {
            code: "NO_ACTIVE_SERVICE".to_string(),
            message: "Enable at least one service with a price".to_string(),
        });
    }

    ValidityResult { submittable: violations.is_empty(), violations }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{evaluate_validity, is_submittable};
    use crate::domain::campaign::{
        CampaignConfig, CampaignUpdate, PaidSocialUpdate, UgcFlatUpdate, UgcUpdate,
    };
    use crate::domain::client::{ArtistTier, ClientDetails};

    fn complete_client() -> ClientDetails {
        ClientDetails {
            artist_name: "Nova".to_string(),
            song_title: "Glow".to_string(),
            genre: "Pop".to_string(),
            tier: Some(ArtistTier::Established),
            ..ClientDetails::default()
        }
    }

    #[test]
    fn zero_enabled_services_blocks_submission() {
        let result = evaluate_validity(&complete_client(), &CampaignConfig::default());

        assert!(!result.submittable);
        let codes: Vec<&str> = result.violations.iter().map(|v| v.code.as_str()).collect();
        assert_eq!(codes, vec!["NO_ACTIVE_SERVICE"]);
    }

    #[test]
    fn missing_client_fields_are_reported_by_code() {
        let mut campaign = CampaignConfig::default();
        campaign.apply(CampaignUpdate::Ugc(UgcUpdate::Group { enabled: true })).expect("group");
        campaign
            .apply(CampaignUpdate::Ugc(UgcUpdate::TrendingPush(UgcFlatUpdate::SetEnabled {
                enabled: true,
            })))
            .expect("trending push");

        let result = evaluate_validity(&ClientDetails::default(), &campaign);
        let codes: Vec<&str> = result.violations.iter().map(|v| v.code.as_str()).collect();
        assert_eq!(
            codes,
            vec!["MISSING_ARTIST_NAME", "MISSING_SONG_TITLE", "MISSING_GENRE", "MISSING_TIER"]
        );
        assert!(is_submittable(&complete_client(), &campaign));
    }

    #[test]
    fn below_minimum_budget_still_counts_as_active() {
        let mut campaign = CampaignConfig::default();
        campaign
            .apply(CampaignUpdate::PaidSocial(PaidSocialUpdate::SetEnabled { enabled: true }))
            .expect("enable");
        assert!(!is_submittable(&complete_client(), &campaign));

        campaign
            .apply(CampaignUpdate::PaidSocial(PaidSocialUpdate::SetBudget {
                budget: Decimal::from(100),
            }))
            .expect("budget");
        assert!(is_submittable(&complete_client(), &campaign));
    }

    #[test]
    fn unlisted_genre_blocks_submission() {
        let mut campaign = CampaignConfig::default();
        campaign.apply(CampaignUpdate::Ugc(UgcUpdate::Group { enabled: true })).expect("group");
        campaign
            .apply(CampaignUpdate::Ugc(UgcUpdate::TrendingPush(UgcFlatUpdate::SetEnabled {
                enabled: true,
            })))
            .expect("trending push");
        let client = ClientDetails { genre: "Sea Shanty".to_string(), ..complete_client() };

        let result = evaluate_validity(&client, &campaign);
        assert!(!result.submittable);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].code, "UNKNOWN_GENRE");
        assert!(result.violations[0].message.contains("Hip-Hop"));
        assert!(!is_submittable(&client, &campaign));

        let client = ClientDetails { genre: "edm".to_string(), ..complete_client() };
        assert!(is_submittable(&client, &campaign));
    }
}
