use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::cpq::{
    aggregate::PricedBreakdown, commission::CommissionBreakdown, validity::ValidityResult,
    CampaignEvaluationInput, CampaignRuntime, DeterministicCampaignRuntime,
};
use crate::domain::campaign::{CampaignConfig, CampaignUpdate};
use crate::domain::client::ClientDetails;
use crate::errors::DomainError;

type HmacSha256 = Hmac<Sha256>;

const PASSWORD_MAC_KEY: &[u8] = b"amplify.portal.login";

/// One salesperson's working state: the auth flag, the client being quoted
/// and the campaign being configured. Nothing here outlives the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PortalSession {
    authenticated: bool,
    client: ClientDetails,
    campaign: CampaignConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub authenticated: bool,
    pub client: ClientDetails,
    pub campaign: CampaignConfig,
    pub pricing: PricedBreakdown,
    pub commission: CommissionBreakdown,
    pub validity: ValidityResult,
}

impl PortalSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn client(&self) -> &ClientDetails {
        &self.client
    }

    pub fn campaign(&self) -> &CampaignConfig {
        &self.campaign
    }

    /// Checks the shared portal password. A failed attempt leaves the
    /// session unauthenticated, even if it was authenticated before.
    pub fn login(&mut self, candidate: &str, expected: &SecretString) -> Result<(), DomainError> {
        self.authenticated = passwords_match(candidate, expected.expose_secret());
        if self.authenticated {
            Ok(())
        } else {
            Err(DomainError::AuthenticationFailed)
        }
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
    }

    pub fn apply(&mut self, update: CampaignUpdate) -> Result<(), DomainError> {
        self.require_authenticated()?;
        self.campaign.apply(update)
    }

    pub fn update_client(&mut self, client: ClientDetails) -> Result<(), DomainError> {
        self.require_authenticated()?;
        self.client = client;
        Ok(())
    }

    /// Starts a new proposal flow. Authentication is kept.
    pub fn reset(&mut self) -> Result<(), DomainError> {
        self.require_authenticated()?;
        self.client = ClientDetails::default();
        self.campaign = CampaignConfig::default();
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let evaluation = DeterministicCampaignRuntime::default()
            .evaluate(CampaignEvaluationInput { client: &self.client, campaign: &self.campaign });

        SessionSnapshot {
            authenticated: self.authenticated,
            client: self.client.clone(),
            campaign: self.campaign.clone(),
            pricing: evaluation.pricing,
            commission: evaluation.commission,
            validity: evaluation.validity,
        }
    }

    fn require_authenticated(&self) -> Result<(), DomainError> {
        if self.authenticated {
            Ok(())
        } else {
            Err(DomainError::NotAuthenticated)
        }
    }
}

/// Both sides are reduced to fixed-length MACs and compared with
/// `verify_slice`, so neither length nor content leaks through timing.
fn passwords_match(candidate: &str, expected: &str) -> bool {
    let Ok(mut expected_mac) = HmacSha256::new_from_slice(PASSWORD_MAC_KEY) else {
        return false;
    };
    expected_mac.update(expected.as_bytes());
    let expected_tag = expected_mac.finalize().into_bytes();

    let Ok(mut candidate_mac) = HmacSha256::new_from_slice(PASSWORD_MAC_KEY) else {
        return false;
    };
    candidate_mac.update(candidate.as_bytes());
    candidate_mac.verify_slice(&expected_tag).is_ok()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use secrecy::SecretString;

    use super::{passwords_match, PortalSession};
    use crate::domain::campaign::{CampaignUpdate, SocialSeedingUpdate};
    use crate::domain::client::{ArtistTier, ClientDetails};
    use crate::errors::DomainError;

    fn password() -> SecretString {
        SecretString::from("sesame".to_owned())
    }

    fn enable_seeding() -> Vec<CampaignUpdate> {
        vec![
            CampaignUpdate::SocialSeeding(SocialSeedingUpdate::SetEnabled { enabled: true }),
            CampaignUpdate::SocialSeeding(SocialSeedingUpdate::SetBudget {
                budget: Decimal::from(500),
            }),
        ]
    }

    #[test]
    fn mutations_require_login() {
        let mut session = PortalSession::new();
        let error = session.apply(enable_seeding().remove(0)).expect_err("not logged in");
        assert_eq!(error, DomainError::NotAuthenticated);
        assert_eq!(session.reset(), Err(DomainError::NotAuthenticated));
        assert_eq!(
            session.update_client(ClientDetails::default()),
            Err(DomainError::NotAuthenticated)
        );
    }

    #[test]
    fn wrong_password_is_rejected_and_clears_auth() {
        let mut session = PortalSession::new();
        session.login("sesame", &password()).expect("correct password");
        assert!(session.is_authenticated());

        assert_eq!(session.login("sesam", &password()), Err(DomainError::AuthenticationFailed));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn snapshot_reflects_campaign_and_reset_starts_over() {
        let mut session = PortalSession::new();
        session.login("sesame", &password()).expect("login");
        for update in enable_seeding() {
            session.apply(update).expect("update");
        }
        session
            .update_client(ClientDetails {
                artist_name: "Nova".to_owned(),
                song_title: "Glow".to_owned(),
                genre: "EDM".to_owned(),
                tier: Some(ArtistTier::MidTier),
                ..ClientDetails::default()
            })
            .expect("client");

        let snapshot = session.snapshot();
        assert!(snapshot.validity.submittable);
        assert_eq!(snapshot.pricing.grand_total, Decimal::from(500));
        assert_eq!(snapshot.commission.total, Decimal::from(30));

        session.reset().expect("reset");
        let snapshot = session.snapshot();
        assert!(snapshot.authenticated);
        assert!(!snapshot.validity.submittable);
        assert!(snapshot.pricing.line_items.is_empty());
        assert_eq!(snapshot.client.artist_name, "");
    }

    #[test]
    fn password_check_rejects_prefixes_and_near_misses() {
        assert!(passwords_match("sesame", "sesame"));
        assert!(!passwords_match("sesamE", "sesame"));
        assert!(!passwords_match("sesam", "sesame"));
        assert!(!passwords_match("sesame ", "sesame"));
        assert!(!passwords_match("", "sesame"));
    }
}
