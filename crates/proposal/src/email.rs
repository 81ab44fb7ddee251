use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::error;

use amplify_core::config::EmailConfig;

use crate::error::ProposalError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Sends the email and returns the provider's message id.
    async fn send(&self, email: &OutgoingEmail) -> Result<String, ProposalError>;
}

/// Transactional email through the Resend API.
#[derive(Clone)]
pub struct ResendTransport {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

#[derive(Deserialize)]
struct ResendResponse {
    #[serde(default)]
    id: Option<String>,
}

impl ResendTransport {
    pub fn from_config(config: &EmailConfig) -> Result<Self, ProposalError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            ProposalError::Configuration("email.api_key is required".to_string())
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| ProposalError::Configuration(error.to_string()))?;

        Ok(Self { client, api_key, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    fn endpoint(&self) -> String {
        format!("{}/emails", self.base_url)
    }
}

#[async_trait]
impl EmailTransport for ResendTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, ProposalError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.api_key.expose_secret())
            .json(email)
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "email request failed");
                ProposalError::Transport(format!("email request failed: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "email provider rejected message");
            return Err(ProposalError::Transport(format!("email provider returned {status}")));
        }

        let body: ResendResponse = response.json().await.map_err(|err| {
            ProposalError::Transport(format!("failed to decode email provider response: {err}"))
        })?;

        body.id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProposalError::Transport("email provider returned no message id".to_string()))
    }
}
