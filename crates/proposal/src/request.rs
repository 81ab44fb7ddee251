use serde::{Deserialize, Serialize};

use amplify_core::cpq::validity::has_active_service;
use amplify_core::domain::campaign::CampaignConfig;
use amplify_core::domain::client::ClientDetails;

use crate::error::ProposalError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRequest {
    pub client: ClientDetails,
    pub campaign: CampaignConfig,
    pub recipient_email: String,
}

/// Trimmed, lower-cased recipient address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recipient(String);

impl Recipient {
    pub fn parse(raw: &str) -> Result<Self, ProposalError> {
        let sanitized = raw.trim().to_lowercase();
        if sanitized.is_empty() || !sanitized.contains('@') {
            return Err(ProposalError::Validation("Valid email address is required".to_string()));
        }
        Ok(Self(sanitized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ProposalRequest {
    /// Checks run before anything leaves the process. Client genre and tier
    /// are optional here; only the portal's submit gate requires them.
    pub fn validate(&self) -> Result<Recipient, ProposalError> {
        let recipient = Recipient::parse(&self.recipient_email)?;

        if self.client.artist_name.trim().is_empty() || self.client.song_title.trim().is_empty() {
            return Err(ProposalError::Validation(
                "Artist name and song title are required".to_string(),
            ));
        }

        if !has_active_service(&self.campaign) {
            return Err(ProposalError::Validation(
                "At least one service must be enabled with valid pricing".to_string(),
            ));
        }

        Ok(recipient)
    }
}

#[cfg(test)]
mod tests {
    use amplify_core::domain::campaign::{CampaignConfig, CampaignUpdate, SocialSeedingUpdate};
    use amplify_core::domain::client::ClientDetails;
    use rust_decimal::Decimal;

    use super::{ProposalRequest, Recipient};
    use crate::error::ProposalError;

    fn seeded_campaign() -> CampaignConfig {
        let mut campaign = CampaignConfig::default();
        campaign
            .apply(CampaignUpdate::SocialSeeding(SocialSeedingUpdate::SetEnabled { enabled: true }))
            .expect("toggle");
        campaign
            .apply(CampaignUpdate::SocialSeeding(SocialSeedingUpdate::SetBudget {
                budget: Decimal::from(500),
            }))
            .expect("budget");
        campaign
    }

    fn request(email: &str) -> ProposalRequest {
        ProposalRequest {
            client: ClientDetails {
                artist_name: "Nova".to_string(),
                song_title: "Glow".to_string(),
                ..ClientDetails::default()
            },
            campaign: seeded_campaign(),
            recipient_email: email.to_string(),
        }
    }

    #[test]
    fn recipient_is_trimmed_and_lower_cased() {
        let recipient = request("  Label@Example.COM ").validate().expect("valid request");
        assert_eq!(recipient.as_str(), "label@example.com");
    }

    #[test]
    fn recipient_without_at_sign_is_rejected() {
        assert_eq!(
            Recipient::parse("label.example.com"),
            Err(ProposalError::Validation("Valid email address is required".to_string()))
        );
        assert!(Recipient::parse("   ").is_err());
    }

    #[test]
    fn missing_song_title_is_rejected() {
        let mut request = request("label@example.com");
        request.client.song_title = "  ".to_string();
        assert_eq!(
            request.validate(),
            Err(ProposalError::Validation("Artist name and song title are required".to_string()))
        );
    }

    #[test]
    fn campaign_without_priced_service_is_rejected() {
        let mut request = request("label@example.com");
        request.campaign = CampaignConfig::default();
        assert!(matches!(request.validate(), Err(ProposalError::Validation(message))
            if message.starts_with("At least one service")));
    }
}
